use q2lsp::config::Config;
use q2lsp::document::{DocumentSnapshot, LineIndex};
use q2lsp::lint::DiagnosticCode;
use q2lsp::lsp::{SOURCE, engine_from_config, to_lsp_diagnostic};
use tower_lsp::lsp_types::{DiagnosticSeverity, NumberOrString};

use crate::common::{fixture_path, fixture_repository, validate};

#[test]
fn unknown_option_converts_with_suggestion_payload() {
    let text = "echo start\nqiime feature-table filter-samples --i-table t.qza --p-min-frequncy 5\n";
    let result = validate(text);
    let diag = result.by_code(DiagnosticCode::UnknownOption).next().unwrap();

    let lsp = to_lsp_diagnostic(diag, &LineIndex::new(text));
    assert_eq!(lsp.range.start.line, 1);
    assert_eq!(lsp.range.start.character, 51);
    assert_eq!(lsp.range.end.character, 51 + 16);
    assert_eq!(lsp.severity, Some(DiagnosticSeverity::WARNING));
    assert_eq!(lsp.code, Some(NumberOrString::String("unknown-option".into())));
    assert_eq!(lsp.source.as_deref(), Some(SOURCE));
    assert_eq!(lsp.data.unwrap()["suggestion"], "p-min-frequency");
}

#[test]
fn configured_engine_follows_the_config_file() {
    let raw = std::fs::read_to_string(fixture_path("configs/strict.toml")).unwrap();
    let config = Config::from_toml(&raw).unwrap();
    assert_eq!(config.diagnostics.debounce_ms, 250);
    assert!(config.options.global.iter().any(|g| g.name == "log-level"));

    let engine = engine_from_config(&config);
    let text = "qiime demux sumarize\nqiime demux summarize --i-data a --p-something 1 --p-something 2 --log-level debug\n";
    let result = engine.validate_document(&DocumentSnapshot::new("file:///a.sh", 1, text), &fixture_repository());

    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let lsp = to_lsp_diagnostic(&result.diagnostics[0], &LineIndex::new(text));
    assert_eq!(lsp.severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(lsp.code, Some(NumberOrString::String("unknown-action".into())));
}

#[test]
fn configured_launcher_changes_the_command_word() {
    let config = Config::from_toml("[server]\nlauncher = \"q2\"\n").unwrap();
    let engine = engine_from_config(&config);
    let text = "qiime demux sumarize\nq2 demux sumarize\n";
    let result = engine.validate_document(&DocumentSnapshot::new("file:///a.sh", 1, text), &fixture_repository());

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(LineIndex::new(text).position(result.diagnostics[0].range.start).line, 1);
}
