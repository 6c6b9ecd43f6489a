//! q2lsp check - report diagnostics for a script without an editor

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::OutputFormat;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::document::{DocumentSnapshot, LineIndex, Position};
use crate::error::{Q2Error, Result};
use crate::lint::{Diagnostic, Severity, ValidationResult};
use crate::lsp::engine_from_config;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Shell script to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Command hierarchy JSON (overrides `signatures.cache_path`)
    #[arg(long, value_name = "PATH")]
    pub signatures: Option<PathBuf>,

    /// Output format (defaults to json under --robot)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    file: String,
    errors: usize,
    warnings: usize,
    truncated: bool,
    skipped: usize,
    diagnostics: Vec<ReportedDiagnostic<'a>>,
}

#[derive(Debug, Serialize)]
struct ReportedDiagnostic<'a> {
    start: Position,
    end: Position,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

pub fn run(ctx: &AppContext, args: &CheckArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)?;
    let repository = ctx.load_repository(args.signatures.as_deref())?;

    let mut config = ctx.config.clone();
    if args.strict {
        config.diagnostics.strict = true;
    }
    let engine = engine_from_config(&config);

    let snapshot = DocumentSnapshot::new(file_uri(&args.file), 0, text);
    let result = engine.validate_document(&snapshot, &repository);

    match args.format.unwrap_or(ctx.output_format) {
        OutputFormat::Json => emit_json(&robot_ok(report(&args.file, &snapshot, &result)))?,
        OutputFormat::Human => output_human(&args.file, &snapshot, &result),
    }

    let errors = result.error_count();
    if errors > 0 {
        return Err(Q2Error::ValidationFailed(format!("{errors} error(s) found")));
    }
    Ok(())
}

fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

fn report<'a>(path: &Path, snapshot: &DocumentSnapshot, result: &'a ValidationResult) -> CheckReport<'a> {
    let index = LineIndex::new(&snapshot.text);
    CheckReport {
        file: path.display().to_string(),
        errors: result.error_count(),
        warnings: result.warning_count(),
        truncated: result.truncated,
        skipped: result.skipped,
        diagnostics: result
            .diagnostics
            .iter()
            .map(|diagnostic| {
                let (start, end) = index.range(diagnostic.range);
                ReportedDiagnostic {
                    start,
                    end,
                    diagnostic,
                }
            })
            .collect(),
    }
}

fn output_human(path: &Path, snapshot: &DocumentSnapshot, result: &ValidationResult) {
    let path_str = path.display().to_string();
    let mut layout = HumanLayout::new();

    if result.diagnostics.is_empty() {
        layout.push_line(format!("{} {}", style("✓").green(), style(&path_str).dim()));
        emit_human(layout);
        return;
    }

    let index = LineIndex::new(&snapshot.text);
    for diag in &result.diagnostics {
        let severity = match diag.severity {
            Severity::Error => style("error").red().bold(),
            Severity::Warning => style("warning").yellow(),
            Severity::Info => style("info").blue(),
            Severity::Hint => style("hint").dim(),
        };
        layout.push_line(format!(
            "{}:{}: {severity}[{}]: {}",
            path_str,
            index.position(diag.range.start),
            diag.code,
            diag.message
        ));
    }

    layout.blank();
    let mut summary = format!(
        "{} error(s), {} warning(s)",
        result.error_count(),
        result.warning_count()
    );
    if result.truncated {
        summary.push_str(" (truncated)");
    }
    if result.skipped > 0 {
        summary.push_str(&format!(", {} invocation(s) skipped", result.skipped));
    }
    layout.push_line(summary);
    emit_human(layout);
}
