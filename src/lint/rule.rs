//! Validation rule trait and the per-invocation context rules read.

use crate::extract::{Invocation, OptionArg};
use crate::options::{
    CanonicalOption, GlobalOption, negated_flag_target, normalize, option_label,
};
use crate::signatures::{ActionSignature, SignatureParameter};

use super::codes::{self, DiagnosticCode};
use super::config::ValidationConfig;
use super::diagnostic::{Diagnostic, Severity};
use super::engine::ValidationError;

/// A check run against one resolved invocation.
///
/// Rules are stateless; everything they need comes through [`RuleContext`].
/// A rule only selects codes and template arguments, and never performs I/O.
pub trait InvocationRule: Send + Sync {
    /// The code this rule reports
    fn code(&self) -> DiagnosticCode;

    /// Human-readable name
    fn name(&self) -> &str;

    /// What this rule checks
    fn description(&self) -> &str;

    /// Default severity, from the registry
    fn default_severity(&self) -> Severity {
        codes::describe(self.code()).default_severity
    }

    /// Run the check
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// A boxed rule for dynamic dispatch
pub type BoxedRule = Box<dyn InvocationRule>;

/// What a written option refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionTarget<'a> {
    Parameter {
        param: &'a SignatureParameter,
        /// Written as `--p-no-<flag>`.
        negated: bool,
    },
    Global(&'a GlobalOption),
    Unknown,
}

/// A written option together with its canonical name and target.
#[derive(Debug, Clone)]
pub struct ResolvedOption<'a> {
    pub arg: &'a OptionArg,
    pub canonical: CanonicalOption,
    pub target: OptionTarget<'a>,
}

impl ResolvedOption<'_> {
    /// The option as written, without any `=value`.
    #[must_use]
    pub fn written(&self) -> &str {
        self.arg
            .raw
            .split_once('=')
            .map_or(self.arg.raw.as_str(), |(name, _)| name)
    }

    /// Key shared by every spelling of the same parameter.
    #[must_use]
    pub fn target_key(&self) -> Option<&str> {
        match self.target {
            OptionTarget::Parameter { param, .. } => Some(param.name.as_str()),
            OptionTarget::Global(global) => Some(global.name.as_str()),
            OptionTarget::Unknown => None,
        }
    }

    /// Whether a value must follow. `None` when the target is unknown.
    #[must_use]
    pub fn takes_value(&self) -> Option<bool> {
        match self.target {
            OptionTarget::Parameter { param, negated } => Some(!negated && param.takes_value()),
            OptionTarget::Global(global) => Some(global.takes_value),
            OptionTarget::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_help(&self) -> bool {
        matches!(self.target, OptionTarget::Global(global) if global.is_help())
    }
}

/// Context provided to rules for one resolved invocation
pub struct RuleContext<'a> {
    pub invocation: &'a Invocation,
    pub signature: &'a ActionSignature,
    pub options: Vec<ResolvedOption<'a>>,
    pub config: &'a ValidationConfig,
}

impl<'a> RuleContext<'a> {
    /// Normalize and resolve every option once, so rules never re-infer.
    pub fn resolve(
        invocation: &'a Invocation,
        signature: &'a ActionSignature,
        config: &'a ValidationConfig,
    ) -> Result<Self, ValidationError> {
        let mut options = Vec::with_capacity(invocation.options.len());
        for arg in &invocation.options {
            let canonical = normalize(&arg.raw);
            if canonical.is_unrecognized() {
                return Err(ValidationError::EmptyCanonicalName {
                    option: arg.raw.clone(),
                });
            }
            let target = resolve_target(&canonical.name, signature, config);
            options.push(ResolvedOption {
                arg,
                canonical,
                target,
            });
        }
        Ok(Self {
            invocation,
            signature,
            options,
            config,
        })
    }

    /// `plugin action` as written.
    #[must_use]
    pub fn command_label(&self) -> String {
        match &self.invocation.action {
            Some(action) => format!("{} {}", self.invocation.plugin.text, action.text),
            None => self.invocation.plugin.text.clone(),
        }
    }

    /// `--help` or `-h` was given.
    #[must_use]
    pub fn help_requested(&self) -> bool {
        self.options.iter().any(ResolvedOption::is_help)
    }

    /// Whether some written option targets the parameter `name`.
    #[must_use]
    pub fn supplies(&self, name: &str) -> bool {
        self.options.iter().any(|o| {
            matches!(o.target, OptionTarget::Parameter { param, .. } if param.name == name)
        })
    }

    /// Signature parameter labels, for suggestions.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&str> {
        self.signature
            .parameters()
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }
}

fn resolve_target<'a>(
    name: &str,
    signature: &'a ActionSignature,
    config: &'a ValidationConfig,
) -> OptionTarget<'a> {
    if let Some(param) = signature.parameter(name) {
        return OptionTarget::Parameter {
            param,
            negated: false,
        };
    }
    if let Some(param) = negated_flag_target(name)
        .and_then(|target| signature.parameter(&target))
        .filter(|param| param.flag)
    {
        return OptionTarget::Parameter {
            param,
            negated: true,
        };
    }
    config
        .global_option(name)
        .map_or(OptionTarget::Unknown, OptionTarget::Global)
}

/// `--name` for a parameter, the way messages show it.
#[must_use]
pub fn parameter_label(param: &SignatureParameter) -> String {
    option_label(&param.name)
}
