use q2lsp::document::{DocumentSnapshot, LineIndex, TextRange};
use q2lsp::lint::{DiagnosticCode, Severity, ValidationConfig, ValidationEngine};
use q2lsp::signatures::SignatureRepository;
use regex::Regex;

use crate::common::{covered, fixture_path, fixture_repository, validate};

#[test]
fn missing_required_parameter_is_reported_on_the_action() {
    let text = "qiime demux summarize --i-data seqs.qza --o-visualization out.qzv\n";
    let result = validate(text);

    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code, DiagnosticCode::MissingRequired);
    assert_eq!(diag.severity, Severity::Error);
    assert_eq!(diag.message, "Missing required option '--p-something'.");
    assert_eq!(covered(text, diag.range.start, diag.range.end), "summarize");
}

#[test]
fn second_occurrence_of_an_option_is_the_duplicate() {
    let text = "qiime demux summarize --i-data a.qza --p-something 1 --p-something 2\n";
    let result = validate(text);

    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code, DiagnosticCode::DuplicateOption);
    let second = text.rfind("--p-something").unwrap();
    assert_eq!(diag.range, TextRange::new(second, second + "--p-something".len()));
}

#[test]
fn unknown_action_suppresses_option_checks() {
    let text = "qiime demux sumarize --bogus x\n";
    let result = validate(text);

    assert_eq!(result.diagnostics.len(), 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code, DiagnosticCode::UnknownAction);
    assert_eq!(
        diag.message,
        "Unknown action 'sumarize' for 'demux'. Did you mean 'summarize'?"
    );
    assert_eq!(covered(text, diag.range.start, diag.range.end), "sumarize");
}

#[test]
fn unknown_plugin_is_reported_on_the_plugin() {
    let text = "qiime demx summarize\n";
    let result = validate(text);

    assert_eq!(result.diagnostics.len(), 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code, DiagnosticCode::UnknownPlugin);
    assert_eq!(diag.message, "Unknown QIIME command 'demx'. Did you mean 'demux'?");
    assert_eq!(covered(text, diag.range.start, diag.range.end), "demx");
}

#[test]
fn continued_command_reports_on_the_physical_line() {
    let text = "qiime demux summarize \\\n  --i-data x.qza --p-somthing 3\n";
    let result = validate(text);

    let unknown: Vec<_> = result.by_code(DiagnosticCode::UnknownOption).collect();
    assert_eq!(unknown.len(), 1);
    let typo = text.find("--p-somthing").unwrap();
    assert_eq!(unknown[0].range.start, typo);
    assert_eq!(unknown[0].suggestion(), Some("p-something"));

    let message = Regex::new(
        r"^Unknown option '--p-somthing' for 'demux summarize'\. Did you mean '--p-something'\?$",
    )
    .unwrap();
    assert!(message.is_match(&unknown[0].message), "{}", unknown[0].message);

    let index = LineIndex::new(text);
    let position = index.position(unknown[0].range.start);
    assert_eq!((position.line, position.character), (1, 17));

    // The typo leaves the real parameter unsupplied.
    assert_eq!(result.by_code(DiagnosticCode::MissingRequired).count(), 1);
}

#[test]
fn well_formed_pipeline_is_clean() {
    let text = std::fs::read_to_string(fixture_path("scripts/pipeline.sh")).unwrap();
    let result = validate(&text);
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(result.passed());
}

#[test]
fn broken_script_reports_each_problem() {
    let text = std::fs::read_to_string(fixture_path("scripts/broken.sh")).unwrap();
    let result = validate(&text);

    let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            DiagnosticCode::MissingRequired,
            DiagnosticCode::UnknownAction,
            DiagnosticCode::UnknownOption,
        ]
    );
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.warning_count(), 2);
    assert_eq!(result.diagnostics[2].suggestion(), Some("p-min-frequency"));
}

#[test]
fn help_and_leaf_commands_are_always_valid() {
    for text in [
        "qiime demux summarize --help\n",
        "qiime demux summarize -h\n",
        "qiime info\n",
        "qiime dev\n",
        "qiime --version\n",
        "qiime\n",
    ] {
        let result = validate(text);
        assert!(result.diagnostics.is_empty(), "{text:?}: {:?}", result.diagnostics);
    }
}

#[test]
fn builtin_actions_use_untagged_options() {
    let result = validate(
        "qiime tools import --type 'SampleData[X]' --input-path m.tsv --output-path d.qza\n",
    );
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);

    let result = validate("qiime tools import --type X --input-path m.tsv\n");
    let missing: Vec<_> = result.by_code(DiagnosticCode::MissingRequired).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].message, "Missing required option '--output-path'.");
}

#[test]
fn negated_flags_and_multiple_options() {
    let base = "qiime feature-table filter-samples --i-table t.qza --o-filtered-table f.qza";

    assert!(validate(&format!("{base} --p-no-exclude-ids\n")).passed());
    assert!(validate(&format!("{base} --p-where a --p-where b\n")).diagnostics.is_empty());

    let result = validate(&format!("{base} --p-exclude-ids --p-no-exclude-ids\n"));
    assert_eq!(result.by_code(DiagnosticCode::DuplicateOption).count(), 1);
}

#[test]
fn metadata_columns_expand_to_file_and_column() {
    let text = "qiime demux emp-single --i-seqs s.qza --o-per-sample-sequences d.qza\n";
    let result = validate(text);

    let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Missing required option '--m-barcodes-file'.",
            "Missing required option '--m-barcodes-column'.",
        ]
    );
}

#[test]
fn option_without_value_is_reported() {
    let text = "qiime demux summarize --i-data --p-something 3\n";
    let result = validate(text);

    let missing: Vec<_> = result.by_code(DiagnosticCode::MissingValue).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(covered(text, missing[0].range.start, missing[0].range.end), "--i-data");
    assert_eq!(result.by_code(DiagnosticCode::MissingRequired).count(), 0);
}

#[test]
fn empty_inline_value_is_reported() {
    let text = "qiime demux summarize --i-data= --p-something 1\n";
    let result = validate(text);

    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code, DiagnosticCode::MissingValue);
    assert_eq!(covered(text, diag.range.start, diag.range.end), "--i-data=");
}

#[test]
fn malformed_invocation_reports_only_the_defect() {
    let text = "qiime demux summarize --p-something 'unterminated\n";
    let result = validate(text);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, DiagnosticCode::MalformedInvocation);
}

#[test]
fn separators_split_invocations() {
    let text = "qiime info && qiime demux sumarize ; echo done | qiime demux summarize --help\n";
    let result = validate(text);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, DiagnosticCode::UnknownAction);
}

#[test]
fn unloaded_repository_explains_itself() {
    let engine = ValidationEngine::with_defaults();
    let repository = SignatureRepository::new();

    let snapshot = DocumentSnapshot::new("file:///a.sh", 1, "qiime demux summarize\nqiime demux\n");
    let result = engine.validate_document(&snapshot, &repository);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].message,
        "Unknown action 'summarize' for 'demux'. Signatures not loaded yet."
    );
}

#[test]
fn configured_engine_applies_strict_and_disabled_codes() {
    let config = ValidationConfig::new()
        .strict()
        .disable_code(DiagnosticCode::DuplicateOption);
    let engine = ValidationEngine::new(config).with_builtin_rules();
    let text = "qiime demux summarize --i-data a --p-something 1 --p-something 2 --p-bogus 1\n";
    let result = engine.validate_document(&DocumentSnapshot::new("file:///a.sh", 1, text), &fixture_repository());

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, DiagnosticCode::UnknownOption);
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
}
