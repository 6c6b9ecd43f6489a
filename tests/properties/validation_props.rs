use proptest::prelude::*;

use q2lsp::document::DocumentSnapshot;
use q2lsp::lint::{DiagnosticCode, ValidationEngine};

use crate::common::{fixture_repository, validate};

proptest! {
    #[test]
    fn test_missing_required_counts_omitted_parameters(
        give_data in any::<bool>(),
        give_something in any::<bool>(),
        give_optional in any::<bool>(),
        reverse in any::<bool>(),
    ) {
        let mut parts = Vec::new();
        if give_data {
            parts.push("--i-data d.qza");
        }
        if give_something {
            parts.push("--p-something 4");
        }
        if give_optional {
            parts.push("--p-n 10 --o-visualization v.qzv");
        }
        if reverse {
            parts.reverse();
        }
        let text = format!("qiime demux summarize {}\n", parts.join(" "));

        let result = validate(&text);
        let omitted = usize::from(!give_data) + usize::from(!give_something);
        prop_assert_eq!(result.by_code(DiagnosticCode::MissingRequired).count(), omitted);
        prop_assert_eq!(result.diagnostics.len(), omitted);
    }

    #[test]
    fn test_diagnostics_stay_inside_the_document(text in ".*") {
        let engine = ValidationEngine::with_defaults();
        let snapshot = DocumentSnapshot::new("file:///p.sh", 1, text.clone());
        let result = engine.validate_document(&snapshot, &fixture_repository());
        prop_assert_eq!(result.skipped, 0);
        for diagnostic in &result.diagnostics {
            prop_assert!(diagnostic.range.start <= diagnostic.range.end);
            prop_assert!(diagnostic.range.end <= text.len());
        }
    }

    #[test]
    fn test_scripts_without_invocations_are_clean(lines in prop::collection::vec("(#[^\n]*|echo [a-z ]*|\\s*)", 0..10)) {
        let result = validate(&lines.join("\n"));
        prop_assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_validation_is_deterministic(flags in prop::collection::vec("--[a-z_-]{1,12}", 0..6)) {
        let text = format!("qiime demux summarize {}\n", flags.join(" x "));
        prop_assert_eq!(validate(&text).diagnostics, validate(&text).diagnostics);
    }
}
