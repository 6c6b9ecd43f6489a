use q2lsp::lint::{DiagnosticCode, Severity, ValidationEngine, all_codes, describe};
use q2lsp::test_utils::{TestCase, run_table_tests};

#[test]
fn codes_round_trip_through_their_stable_strings() -> Result<(), String> {
    let cases: Vec<TestCase<&str, Option<DiagnosticCode>>> = vec![
        TestCase {
            name: "unknown plugin",
            input: "unknown-plugin",
            expected: Some(DiagnosticCode::UnknownPlugin),
            should_panic: false,
        },
        TestCase {
            name: "malformed",
            input: "malformed-invocation",
            expected: Some(DiagnosticCode::MalformedInvocation),
            should_panic: false,
        },
        TestCase {
            name: "wrong case is not a code",
            input: "Missing-Required",
            expected: None,
            should_panic: false,
        },
        TestCase {
            name: "retired spelling",
            input: "unknown_option",
            expected: None,
            should_panic: false,
        },
    ];

    run_table_tests(cases, |raw| raw.parse::<DiagnosticCode>().ok())
}

#[test]
fn every_code_has_a_registry_entry() {
    let entries = all_codes();
    assert_eq!(entries.len(), 7);
    for entry in entries {
        assert_eq!(describe(entry.code), entry);
        assert!(!entry.template.is_empty());
        assert_eq!(serde_json::to_value(entry.code).unwrap(), entry.code.as_str());
    }
}

#[test]
fn only_missing_and_malformed_default_to_error() {
    let errors: Vec<_> = all_codes()
        .iter()
        .filter(|entry| entry.default_severity == Severity::Error)
        .map(|entry| entry.code.as_str())
        .collect();
    assert_eq!(errors, vec!["missing-required", "missing-value", "malformed-invocation"]);
}

#[test]
fn builtin_rules_are_listed_with_their_codes() {
    let engine = ValidationEngine::with_defaults();
    let rules = engine.list_rules();
    let codes: Vec<_> = rules.iter().map(|r| r.code).collect();
    assert_eq!(
        codes,
        vec![
            DiagnosticCode::UnknownOption,
            DiagnosticCode::DuplicateOption,
            DiagnosticCode::MissingRequired,
            DiagnosticCode::MissingValue,
        ]
    );
    assert!(rules.iter().all(|r| !r.disabled));
}
