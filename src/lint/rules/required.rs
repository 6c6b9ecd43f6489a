//! Required-parameter coverage.

use crate::lint::codes::DiagnosticCode;
use crate::lint::diagnostic::Diagnostic;
use crate::lint::rule::{InvocationRule, RuleContext, parameter_label};

/// One diagnostic per required, non-output parameter that was not given.
///
/// Outputs are left out: the toolkit can write them under `--output-dir`.
/// Nothing is reported when help was requested, since the command then
/// only prints usage.
pub struct MissingRequiredRule;

impl InvocationRule for MissingRequiredRule {
    fn code(&self) -> DiagnosticCode {
        DiagnosticCode::MissingRequired
    }

    fn name(&self) -> &'static str {
        "Missing Required"
    }

    fn description(&self) -> &'static str {
        "Required inputs, parameters and metadata must be supplied"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        if ctx.help_requested() {
            return Vec::new();
        }
        let anchor = ctx.invocation.anchor();

        ctx.signature
            .user_required()
            .filter(|param| !ctx.supplies(&param.name))
            .map(|param| {
                Diagnostic::from_code(
                    self.code(),
                    anchor,
                    &[("option", &parameter_label(param))],
                )
            })
            .collect()
    }
}
