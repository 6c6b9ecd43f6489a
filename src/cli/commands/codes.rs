//! q2lsp codes - list diagnostic codes

use clap::Args;
use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::lint::{Severity, all_codes};

#[derive(Args, Debug)]
pub struct CodesArgs {
    /// Output format (defaults to json under --robot)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
struct CodeRow {
    code: &'static str,
    summary: &'static str,
    template: &'static str,
    default_severity: Severity,
    severity: Severity,
    disabled: bool,
}

pub fn run(ctx: &AppContext, args: &CodesArgs) -> Result<()> {
    let validation = ctx.config.validation_config();
    let rows: Vec<CodeRow> = all_codes()
        .iter()
        .map(|entry| CodeRow {
            code: entry.code.as_str(),
            summary: entry.summary,
            template: entry.template,
            default_severity: entry.default_severity,
            severity: validation.effective_severity(entry.code, entry.default_severity),
            disabled: validation.is_code_disabled(entry.code),
        })
        .collect();

    match args.format.unwrap_or(ctx.output_format) {
        OutputFormat::Json => emit_json(&robot_ok(rows)),
        OutputFormat::Human => {
            let mut layout = HumanLayout::new();
            layout.title("Diagnostic codes");
            for row in &rows {
                let severity = if row.disabled {
                    style("disabled".to_string()).dim()
                } else {
                    style(row.severity.to_string()).bold()
                };
                layout.kv(row.code, &format!("{severity:<9} {}", row.summary));
            }
            emit_human(layout);
            Ok(())
        }
    }
}
