use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Q2Error, Result};
use crate::extract::DEFAULT_LAUNCHER;
use crate::lint::{DiagnosticCode, Severity, ValidationConfig};
use crate::options::{GlobalOption, default_global_options};

pub const PROJECT_CONFIG_FILE: &str = ".q2lsp.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub signatures: SignaturesConfig,
    #[serde(default)]
    pub options: OptionsConfig,
}

impl Config {
    /// Load layered configuration.
    ///
    /// An explicit path (or `Q2LSP_CONFIG`) replaces the global and project
    /// files. Environment overrides apply last either way.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("Q2LSP_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let Some(patch) = Self::load_patch(&path)? else {
                return Err(Q2Error::MissingConfig(path.display().to_string()));
            };
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Parse a single TOML document on top of the defaults.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch = toml::from_str(raw)
            .map_err(|err| Q2Error::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            debug!("no user config directory; skipping global config");
            return Ok(None);
        };
        Self::load_patch(&dir.join("q2lsp/config.toml"))
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        let path = project_root.join(PROJECT_CONFIG_FILE);
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| Q2Error::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| Q2Error::Config(format!("parse config {}: {err}", path.display())))?;
        debug!(path = %path.display(), "loaded config layer");
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.server {
            self.server.merge(patch);
        }
        if let Some(patch) = patch.diagnostics {
            self.diagnostics.merge(patch);
        }
        if let Some(patch) = patch.signatures {
            self.signatures.merge(patch);
        }
        if let Some(patch) = patch.options {
            self.options.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(&|key| std::env::var(key).ok())
    }

    /// Apply `Q2LSP_*` overrides read through `lookup`.
    pub fn apply_overrides_from(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("Q2LSP_LAUNCHER") {
            self.server.launcher = value;
        }

        if let Some(value) = env_u64(lookup, "Q2LSP_DEBOUNCE_MS")? {
            self.diagnostics.debounce_ms = value;
        }
        if let Some(value) = env_bool(lookup, "Q2LSP_STRICT") {
            self.diagnostics.strict = value;
        }
        if let Some(value) = env_u64(lookup, "Q2LSP_MAX_DIAGNOSTICS")? {
            self.diagnostics.max_diagnostics = Some(usize::try_from(value).unwrap_or(usize::MAX));
        }
        if let Some(values) = env_list(lookup, "Q2LSP_DISABLED_CODES") {
            for value in values {
                let code = value
                    .parse::<DiagnosticCode>()
                    .map_err(|err| Q2Error::Config(format!("Q2LSP_DISABLED_CODES: {err}")))?;
                self.diagnostics.disabled_codes.insert(code);
            }
        }

        if let Some(value) = lookup("Q2LSP_SIGNATURES") {
            self.signatures.cache_path = Some(PathBuf::from(value));
        }

        Ok(())
    }

    /// Debounce window for document changes.
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.diagnostics.debounce_ms)
    }

    /// Engine settings derived from this config.
    #[must_use]
    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig {
            disabled_codes: self.diagnostics.disabled_codes.clone(),
            severity_overrides: self.diagnostics.severity_overrides.clone(),
            strict: self.diagnostics.strict,
            max_diagnostics: self.diagnostics.max_diagnostics,
            global_options: self.options.global.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Command word that starts an invocation
    #[serde(default)]
    pub launcher: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            launcher: DEFAULT_LAUNCHER.to_string(),
        }
    }
}

impl ServerConfig {
    fn merge(&mut self, patch: ServerPatch) {
        if let Some(value) = patch.launcher {
            self.launcher = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub debounce_ms: u64,
    #[serde(default)]
    pub disabled_codes: HashSet<DiagnosticCode>,
    #[serde(default)]
    pub severity_overrides: HashMap<DiagnosticCode, Severity>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub max_diagnostics: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 400,
            disabled_codes: HashSet::new(),
            severity_overrides: HashMap::new(),
            strict: false,
            max_diagnostics: None,
        }
    }
}

impl DiagnosticsConfig {
    fn merge(&mut self, patch: DiagnosticsPatch) {
        if let Some(value) = patch.debounce_ms {
            self.debounce_ms = value;
        }
        if let Some(values) = patch.disabled_codes {
            self.disabled_codes.extend(values);
        }
        if let Some(values) = patch.severity_overrides {
            self.severity_overrides.extend(values);
        }
        if let Some(value) = patch.strict {
            self.strict = value;
        }
        if let Some(value) = patch.max_diagnostics {
            self.max_diagnostics = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignaturesConfig {
    /// Cached command hierarchy JSON
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

impl SignaturesConfig {
    fn merge(&mut self, patch: SignaturesPatch) {
        if let Some(value) = patch.cache_path {
            self.cache_path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Options accepted on every action
    #[serde(default)]
    pub global: Vec<GlobalOption>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            global: default_global_options(),
        }
    }
}

impl OptionsConfig {
    fn merge(&mut self, patch: OptionsPatch) {
        if let Some(values) = patch.global {
            self.global = values;
        }
        for extra in patch.extra_global.unwrap_or_default() {
            if !self.global.iter().any(|g| g.name == extra.name) {
                self.global.push(extra);
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub server: Option<ServerPatch>,
    pub diagnostics: Option<DiagnosticsPatch>,
    pub signatures: Option<SignaturesPatch>,
    pub options: Option<OptionsPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServerPatch {
    pub launcher: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DiagnosticsPatch {
    pub debounce_ms: Option<u64>,
    pub disabled_codes: Option<Vec<DiagnosticCode>>,
    pub severity_overrides: Option<HashMap<DiagnosticCode, Severity>>,
    pub strict: Option<bool>,
    pub max_diagnostics: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SignaturesPatch {
    pub cache_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OptionsPatch {
    /// Replaces the whole global option set
    pub global: Option<Vec<GlobalOption>>,
    /// Added to the global option set
    pub extra_global: Option<Vec<GlobalOption>>,
}

fn env_bool(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    lookup(key).map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u64(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match lookup(key) {
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| Q2Error::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}

fn env_list(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<Vec<String>> {
    lookup(key).map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
}
