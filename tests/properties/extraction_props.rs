use proptest::prelude::*;

use q2lsp::document::DocumentSnapshot;
use q2lsp::extract::extract;

fn shell_word() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "qiime", "demux", "summarize", "--i-data", "x.qza", "--p-something", "3", "--p-n=5",
        "\\\n", "\\", "\n", "\r\n", ";", "&&", "||", "|", "'q", "\"", "'a b'", "#", "--", "-h",
        "=", "é", "\t", "echo",
    ])
}

fn shell_text() -> impl Strategy<Value = String> {
    prop::collection::vec(shell_word(), 0..40).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn test_ranges_stay_inside_the_text(text in ".*") {
        let snapshot = DocumentSnapshot::new("file:///p.sh", 1, text.clone());
        for invocation in extract(&snapshot) {
            prop_assert!(invocation.range.start <= invocation.range.end);
            prop_assert!(invocation.range.end <= text.len());
        }
    }

    #[test]
    fn test_shell_like_ranges_are_nested(text in shell_text()) {
        let snapshot = DocumentSnapshot::new("file:///p.sh", 1, text.clone());
        for invocation in extract(&snapshot) {
            prop_assert!(text.get(invocation.range.start..invocation.range.end).is_some());
            prop_assert!(invocation.range.contains_range(&invocation.plugin.range));
            if let Some(action) = &invocation.action {
                prop_assert!(invocation.range.contains_range(&action.range));
            }
            for option in &invocation.options {
                prop_assert!(invocation.range.contains_range(&option.range));
                prop_assert!(text[option.range.start..option.range.end].starts_with('-'));
            }
            if let Some(malformed) = &invocation.malformed {
                prop_assert!(invocation.range.contains_range(&malformed.range));
            }
        }
    }

    #[test]
    fn test_extraction_is_deterministic(text in shell_text()) {
        let snapshot = DocumentSnapshot::new("file:///p.sh", 1, text);
        let first: Vec<_> = extract(&snapshot).collect();
        let second: Vec<_> = extract(&snapshot).collect();
        prop_assert_eq!(first, second);
    }
}
