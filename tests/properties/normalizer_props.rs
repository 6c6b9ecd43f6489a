use proptest::prelude::*;

use q2lsp::options::{normalize, option_label};

proptest! {
    #[test]
    fn test_normalize_is_idempotent(raw in "[-_A-Za-z0-9= ]{0,24}") {
        let once = normalize(&raw);
        let twice = normalize(&once.name);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_is_total(raw in ".*") {
        let canonical = normalize(&raw);
        prop_assert!(!canonical.name.contains('='));
        prop_assert!(!canonical.name.contains('_'));
        prop_assert!(!canonical.name.starts_with('-'));
    }

    #[test]
    fn test_labels_normalize_back(name in "[a-z][a-z0-9-]{0,15}") {
        prop_assert_eq!(normalize(&option_label(&name)).name, name);
    }

    #[test]
    fn test_inline_values_are_ignored(name in "[a-z][a-z0-9-]{0,15}", value in ".*") {
        let written = format!("--{name}={value}");
        prop_assert_eq!(normalize(&written).name, name);
    }
}
