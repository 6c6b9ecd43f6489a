//! Rules over the written options: recognition, duplicates, values.

use std::collections::HashSet;

use crate::lint::codes::{DiagnosticCode, did_you_mean};
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::{InvocationRule, OptionTarget, RuleContext};
use crate::lint::suggest::{DEFAULT_LIMIT, suggest};
use crate::options::option_label;

/// Options that match no parameter of the action and no global option.
pub struct UnknownOptionRule;

impl InvocationRule for UnknownOptionRule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::UnknownOption
    }

    fn name(&self) -> &'static str {
        "Unknown Option"
    }

    fn description(&self) -> &'static str {
        "Every option must name a parameter of the action or a global option"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let candidates = ctx.parameter_names();
        let command = ctx.command_label();

        ctx.options
            .iter()
            .filter(|o| o.target == OptionTarget::Unknown)
            .map(|o| {
                let found = suggest(&o.canonical.name, candidates.iter().copied(), DEFAULT_LIMIT);
                let labels: Vec<String> = found.iter().map(|name| option_label(name)).collect();
                let diagnostic = Diagnostic::from_code(
                    self.code(),
                    o.arg.range,
                    &[
                        ("option", o.written()),
                        ("command", &command),
                        ("hint", &did_you_mean(&labels)),
                    ],
                );
                match found.into_iter().next() {
                    Some(best) => diagnostic.with_suggestion(best),
                    None => diagnostic,
                }
            })
            .collect()
    }
}

/// Second and later occurrences of the same parameter.
pub struct DuplicateOptionRule;

impl InvocationRule for DuplicateOptionRule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::DuplicateOption
    }

    fn name(&self) -> &'static str {
        "Duplicate Option"
    }

    fn description(&self) -> &'static str {
        "A parameter that is not marked multiple may be given only once"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut seen = HashSet::new();
        let mut diagnostics = Vec::new();

        for option in &ctx.options {
            if matches!(option.target, OptionTarget::Parameter { param, .. } if param.multiple) {
                continue;
            }
            let Some(key) = option.target_key() else {
                continue;
            };
            if !seen.insert(key) {
                diagnostics.push(Diagnostic::from_code(
                    self.code(),
                    option.arg.range,
                    &[("option", option.written())],
                ));
            }
        }

        diagnostics
    }
}

/// Value-taking options with nothing after them.
pub struct MissingValueRule;

impl InvocationRule for MissingValueRule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::MissingValue
    }

    fn name(&self) -> &'static str {
        "Missing Value"
    }

    fn description(&self) -> &'static str {
        "Options other than boolean flags must be followed by a value"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        ctx.options
            .iter()
            .filter(|o| o.takes_value() == Some(true) && !o.arg.has_value())
            .map(|o| {
                Diagnostic::from_code(self.code(), o.arg.range, &[("option", o.written())])
            })
            .collect()
    }
}
