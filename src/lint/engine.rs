//! Validation engine: resolves invocations and runs rules over them.

use thiserror::Error;
use tracing::{debug, error};

use crate::document::{DocumentSnapshot, TextRange};
use crate::extract::{Extractor, Invocation};
use crate::signatures::{LookupMiss, SignatureRepository};

use super::codes::{self, DiagnosticCode};
use super::config::ValidationConfig;
use super::diagnostic::{Diagnostic, Severity};
use super::rule::{BoxedRule, RuleContext};
use super::rules::all_rules;
use super::suggest::{DEFAULT_LIMIT, suggest};

/// Internal defects. These are bugs, not user mistakes: the offending
/// invocation is skipped and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("option '{option}' normalized to an empty name")]
    EmptyCanonicalName { option: String },

    #[error("{code} diagnostic at {range} escapes invocation range {invocation}")]
    RangeEscapesInvocation {
        code: DiagnosticCode,
        range: TextRange,
        invocation: TextRange,
    },
}

/// Result of validating a document
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// All diagnostics collected
    pub diagnostics: Vec<Diagnostic>,
    /// Whether diagnostics were cut off at `max_diagnostics`
    pub truncated: bool,
    /// Invocations skipped because of an internal defect
    pub skipped: usize,
}

impl ValidationResult {
    /// Get error diagnostics
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    /// Get warning diagnostics
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    /// Diagnostics with the given code
    pub fn by_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.code == code)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// No error-severity diagnostics
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }
}

/// The validation engine that manages and runs rules
pub struct ValidationEngine {
    rules: Vec<BoxedRule>,
    config: ValidationConfig,
    extractor: Extractor,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ValidationEngine {
    /// An engine with `config` and no rules registered
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            rules: Vec::new(),
            config,
            extractor: Extractor::default(),
        }
    }

    /// Default config and every built-in rule
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ValidationConfig::default()).with_builtin_rules()
    }

    /// Register every built-in rule
    #[must_use]
    pub fn with_builtin_rules(mut self) -> Self {
        for rule in all_rules() {
            self.register(rule);
        }
        self
    }

    /// Register a rule
    pub fn register(&mut self, rule: BoxedRule) {
        self.rules.push(rule);
    }

    /// Register a rule (builder pattern)
    #[must_use]
    pub fn with_rule(mut self, rule: BoxedRule) -> Self {
        self.register(rule);
        self
    }

    /// Use a different launcher keyword
    #[must_use]
    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &[BoxedRule] {
        &self.rules
    }

    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    #[must_use]
    pub const fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Validate one invocation against `repository`.
    pub fn validate(
        &self,
        invocation: &Invocation,
        repository: &SignatureRepository,
    ) -> Result<Vec<Diagnostic>, ValidationError> {
        let mut diagnostics = self.check(invocation, repository)?;

        for diag in &diagnostics {
            if !invocation.range.contains_range(&diag.range) {
                return Err(ValidationError::RangeEscapesInvocation {
                    code: diag.code,
                    range: diag.range,
                    invocation: invocation.range,
                });
            }
        }

        diagnostics.retain(|d| !self.config.is_code_disabled(d.code));
        for diag in &mut diagnostics {
            diag.severity = self.config.effective_severity(diag.code, diag.severity);
        }
        Ok(diagnostics)
    }

    fn check(
        &self,
        invocation: &Invocation,
        repository: &SignatureRepository,
    ) -> Result<Vec<Diagnostic>, ValidationError> {
        if let Some(malformed) = &invocation.malformed {
            let reason = malformed.reason.to_string();
            return Ok(vec![Diagnostic::from_code(
                DiagnosticCode::MalformedInvocation,
                malformed.range,
                &[("reason", &reason)],
            )]);
        }

        let plugin = &invocation.plugin.text;
        let Some(action) = &invocation.action else {
            // Only the plugin can be checked without an action.
            if repository.is_loaded() && !repository.knows_plugin(plugin) {
                return Ok(vec![unknown_plugin(invocation, repository)]);
            }
            return Ok(Vec::new());
        };

        if repository.is_leaf_command(plugin) {
            return Ok(Vec::new());
        }

        let signature = match repository.lookup(plugin, &action.text) {
            Ok(signature) => signature,
            Err(LookupMiss::NotLoaded) => {
                return Ok(vec![Diagnostic::from_code(
                    DiagnosticCode::UnknownAction,
                    action.range,
                    &[
                        ("action", &action.text),
                        ("plugin", plugin),
                        ("hint", &codes::not_loaded_hint()),
                    ],
                )]);
            }
            Err(LookupMiss::UnknownPlugin) => {
                return Ok(vec![unknown_plugin(invocation, repository)]);
            }
            Err(LookupMiss::UnknownAction) => {
                let found = suggest(
                    &action.text,
                    repository.action_names(plugin),
                    DEFAULT_LIMIT,
                );
                return Ok(vec![Diagnostic::from_code(
                    DiagnosticCode::UnknownAction,
                    action.range,
                    &[
                        ("action", &action.text),
                        ("plugin", plugin),
                        ("hint", &codes::did_you_mean(&found)),
                    ],
                )]);
            }
        };

        let ctx = RuleContext::resolve(invocation, signature, &self.config)?;
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            if self.config.is_code_disabled(rule.code()) {
                continue;
            }
            diagnostics.extend(rule.check(&ctx));
        }
        Ok(diagnostics)
    }

    /// Extract and validate a whole document.
    ///
    /// An invocation that hits an internal defect is logged and skipped;
    /// the rest of the document still reports.
    #[must_use]
    pub fn validate_document(
        &self,
        snapshot: &DocumentSnapshot,
        repository: &SignatureRepository,
    ) -> ValidationResult {
        let mut result = ValidationResult::default();
        let mut invocations = 0usize;

        for invocation in self.extractor.extract(snapshot) {
            invocations += 1;
            match self.validate(&invocation, repository) {
                Ok(diagnostics) => result.diagnostics.extend(diagnostics),
                Err(err) => {
                    error!(
                        uri = %snapshot.uri,
                        version = snapshot.version,
                        range = %invocation.range,
                        error = %err,
                        "skipping invocation after internal validation error"
                    );
                    result.skipped += 1;
                }
            }
        }

        if let Some(max) = self.config.max_diagnostics {
            if result.diagnostics.len() > max {
                result.diagnostics.truncate(max);
                result.truncated = true;
            }
        }

        debug!(
            uri = %snapshot.uri,
            version = snapshot.version,
            invocations,
            diagnostics = result.diagnostics.len(),
            skipped = result.skipped,
            "validated document"
        );
        result
    }

    /// List all registered rules
    #[must_use]
    pub fn list_rules(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|r| RuleInfo {
                code: r.code(),
                name: r.name().to_string(),
                description: r.description().to_string(),
                default_severity: r.default_severity(),
                disabled: self.config.is_code_disabled(r.code()),
            })
            .collect()
    }
}

fn unknown_plugin(invocation: &Invocation, repository: &SignatureRepository) -> Diagnostic {
    let plugin = &invocation.plugin.text;
    let found = suggest(plugin, repository.plugin_names(), DEFAULT_LIMIT);
    Diagnostic::from_code(
        DiagnosticCode::UnknownPlugin,
        invocation.plugin.range,
        &[("plugin", plugin), ("hint", &codes::did_you_mean(&found))],
    )
}

/// Information about a registered rule
#[derive(Debug, Clone)]
pub struct RuleInfo {
    pub code: DiagnosticCode,
    pub name: String,
    pub description: String,
    pub default_severity: Severity,
    pub disabled: bool,
}
