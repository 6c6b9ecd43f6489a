use std::fs;

use q2lsp::config::Config;
use q2lsp::lint::{DiagnosticCode, Severity};
use q2lsp::test_utils::{TestCase, run_table_tests};

use crate::common::fixture_path;

#[test]
fn config_sections_from_fixture() -> Result<(), String> {
    let cases = vec![TestCase {
        name: "strict",
        input: "configs/strict.toml",
        expected: (
            "qiime".to_string(),
            250u64,
            true,
            Some(50usize),
            true,
            Some(Severity::Error),
        ),
        should_panic: false,
    }];

    run_table_tests(cases, |relative_path| {
        let raw = fs::read_to_string(fixture_path(relative_path)).expect("read fixture");
        let config = Config::from_toml(&raw).expect("parse config");
        (
            config.server.launcher,
            config.diagnostics.debounce_ms,
            config.diagnostics.strict,
            config.diagnostics.max_diagnostics,
            config
                .diagnostics
                .disabled_codes
                .contains(&DiagnosticCode::DuplicateOption),
            config
                .diagnostics
                .severity_overrides
                .get(&DiagnosticCode::UnknownAction)
                .copied(),
        )
    })
}

#[test]
fn validation_config_carries_every_setting() {
    let raw = fs::read_to_string(fixture_path("configs/strict.toml")).unwrap();
    let config = Config::from_toml(&raw).unwrap();
    let validation = config.validation_config();

    assert!(validation.strict);
    assert_eq!(validation.max_diagnostics, Some(50));
    assert!(validation.is_code_disabled(DiagnosticCode::DuplicateOption));
    assert_eq!(
        validation.effective_severity(DiagnosticCode::UnknownOption, Severity::Warning),
        Severity::Error
    );
    assert!(validation.global_option("help").is_some());
    assert!(validation.global_option("log-level").is_some_and(|g| g.takes_value));
    assert_eq!(config.debounce().as_millis(), 250);
}

#[test]
fn global_option_list_can_be_replaced() {
    let config = Config::from_toml(
        r#"
        [options]
        global = [{ name = "help" }]
        "#,
    )
    .unwrap();
    assert_eq!(config.options.global.len(), 1);
    assert!(!config.options.global[0].takes_value);
}
