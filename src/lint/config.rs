//! Validation configuration.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::codes::DiagnosticCode;
use super::diagnostic::Severity;
use crate::options::{GlobalOption, default_global_options};

/// Configuration for validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Codes to suppress
    #[serde(default)]
    pub disabled_codes: HashSet<DiagnosticCode>,

    /// Severity overrides by code
    #[serde(default)]
    pub severity_overrides: HashMap<DiagnosticCode, Severity>,

    /// Treat warnings as errors
    #[serde(default)]
    pub strict: bool,

    /// Maximum diagnostics reported per document
    #[serde(default)]
    pub max_diagnostics: Option<usize>,

    /// Options accepted on every action
    #[serde(default = "default_global_options")]
    pub global_options: Vec<GlobalOption>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            disabled_codes: HashSet::new(),
            severity_overrides: HashMap::new(),
            strict: false,
            max_diagnostics: None,
            global_options: default_global_options(),
        }
    }
}

impl ValidationConfig {
    /// Create a new default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable strict mode
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Set max diagnostics per document
    #[must_use]
    pub const fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = Some(max);
        self
    }

    /// Disable a code
    #[must_use]
    pub fn disable_code(mut self, code: DiagnosticCode) -> Self {
        self.disabled_codes.insert(code);
        self
    }

    /// Override severity for a code
    #[must_use]
    pub fn override_severity(mut self, code: DiagnosticCode, severity: Severity) -> Self {
        self.severity_overrides.insert(code, severity);
        self
    }

    /// Replace the global option set
    #[must_use]
    pub fn with_global_options(mut self, options: Vec<GlobalOption>) -> Self {
        self.global_options = options;
        self
    }

    /// Check if a code is disabled
    #[must_use]
    pub fn is_code_disabled(&self, code: DiagnosticCode) -> bool {
        self.disabled_codes.contains(&code)
    }

    /// Get effective severity for a code
    #[must_use]
    pub fn effective_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        let severity = self
            .severity_overrides
            .get(&code)
            .copied()
            .unwrap_or(default);

        if self.strict && severity == Severity::Warning {
            Severity::Error
        } else {
            severity
        }
    }

    /// Look up a global option by canonical name
    #[must_use]
    pub fn global_option(&self, name: &str) -> Option<&GlobalOption> {
        self.global_options.iter().find(|g| g.name == name)
    }
}
