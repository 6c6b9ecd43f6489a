use q2lsp::Q2Error;
use q2lsp::signatures::{LookupMiss, ParamKind, hierarchy};

use crate::common::{fixture_path, fixture_repository};

#[test]
fn fixture_hierarchy_loads_every_action() {
    let repository = fixture_repository();

    assert!(repository.is_loaded());
    assert_eq!(repository.len(), 5);
    assert_eq!(repository.plugin_names(), vec!["demux", "dev", "feature-table", "info", "tools"]);
    assert_eq!(repository.action_names("demux"), vec!["emp-single", "summarize"]);
    assert!(repository.is_leaf_command("info"));
    assert!(repository.is_leaf_command("dev"));
    assert!(!repository.is_leaf_command("tools"));
}

#[test]
fn required_is_inferred_from_defaults() {
    let repository = fixture_repository();
    let summarize = repository.lookup("demux", "summarize").unwrap();

    let required: Vec<_> = summarize.user_required().map(|p| p.name.as_str()).collect();
    assert_eq!(required, vec!["i-data", "p-something"]);

    let n = summarize.parameter("p-n").unwrap();
    assert!(!n.required);
    assert_eq!(n.default.as_deref(), Some("10000"));
    assert_eq!(n.type_descriptor.as_deref(), Some("Int"));

    let visualization = summarize.parameter("o-visualization").unwrap();
    assert_eq!(visualization.kind, ParamKind::Output);
    assert!(visualization.required);
}

#[test]
fn flags_and_multiple_are_read() {
    let repository = fixture_repository();
    let filter = repository.lookup("feature-table", "filter-samples").unwrap();

    assert!(filter.parameter("p-exclude-ids").unwrap().flag);
    assert!(!filter.parameter("p-exclude-ids").unwrap().takes_value());
    assert!(filter.parameter("p-where").unwrap().multiple);
    assert!(!filter.parameter("p-min-frequency").unwrap().multiple);
    assert_eq!(filter.parameter("m-metadata-file").unwrap().kind, ParamKind::Metadata);
}

#[test]
fn lookup_misses_are_classified() {
    let repository = fixture_repository();
    assert_eq!(repository.lookup("DEMUX", "Summarize").map(|s| s.action()), Ok("summarize"));
    assert_eq!(repository.lookup("demx", "summarize").unwrap_err(), LookupMiss::UnknownPlugin);
    assert_eq!(repository.lookup("demux", "sumarize").unwrap_err(), LookupMiss::UnknownAction);
}

#[test]
fn missing_cache_file_is_reported() {
    let err = hierarchy::load_file(&fixture_path("absent.json")).unwrap_err();
    assert!(matches!(err, Q2Error::SignaturesNotFound(_)));
}

#[test]
fn non_object_root_is_invalid() {
    let err = hierarchy::parse_hierarchy("[1, 2]").unwrap_err();
    assert!(matches!(err, Q2Error::InvalidSignature(_)));
}
