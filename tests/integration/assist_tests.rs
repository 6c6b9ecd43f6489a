use q2lsp::assist::{CompletionKind, CursorSlot, complete, cursor_context, hover};
use q2lsp::document::{LineIndex, Position};
use q2lsp::lsp::{to_lsp_completion, to_lsp_hover};
use tower_lsp::lsp_types::{CompletionItemKind, CompletionTextEdit, HoverContents};

use crate::common::fixture_repository;

fn at(text: &str, line: u32, character: u32) -> q2lsp::assist::CursorContext {
    let offset = LineIndex::new(text).offset(Position { line, character });
    cursor_context(text, offset, "qiime").expect("cursor inside an invocation")
}

#[test]
fn commands_complete_with_discovery_help() {
    let text = "qiime d\n";
    let items = complete(&at(text, 0, 7), &fixture_repository());

    let found: Vec<_> = items.iter().map(|i| (i.label.as_str(), i.kind)).collect();
    assert_eq!(
        found,
        vec![("demux", CompletionKind::Plugin), ("dev", CompletionKind::Builtin)]
    );
    assert_eq!(items[0].detail, "Plugin for demultiplexing & viewing sequence quality.");

    let info = complete(&at("qiime in\n", 0, 8), &fixture_repository());
    assert_eq!(info[0].detail, "Display information about current deployment.");
}

#[test]
fn actions_complete_on_a_continued_line() {
    let text = "qiime demux \\\n  \n";
    let context = at(text, 1, 2);
    assert_eq!(context.slot, CursorSlot::Action);

    let items = complete(&context, &fixture_repository());
    let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, vec!["emp-single", "summarize"]);
    assert_eq!(items[0].detail, "Action");
    assert!(items[1].detail.starts_with("Summarize counts per sample"));
}

#[test]
fn negated_flag_is_offered_and_converted() {
    let text = "qiime demux emp-single --i-seqs s.qza --p-no\n";
    let items = complete(&at(text, 0, 44), &fixture_repository());
    assert_eq!(items.len(), 1, "{items:?}");
    assert_eq!(items[0].label, "--p-no-golay-error-correction");

    let lsp = to_lsp_completion(&items[0], &LineIndex::new(text));
    assert_eq!(lsp.kind, Some(CompletionItemKind::FIELD));
    let Some(CompletionTextEdit::Edit(edit)) = lsp.text_edit else {
        panic!("expected a plain text edit");
    };
    assert_eq!(edit.new_text, "--p-no-golay-error-correction");
    assert_eq!((edit.range.start.character, edit.range.end.character), (38, 44));
}

#[test]
fn hover_shows_action_and_parameter_help() {
    let text = "qiime demux summarize --i-data seqs.qza\n";
    let repository = fixture_repository();

    let action = hover(&at(text, 0, 14), &repository).unwrap();
    assert_eq!(
        action.contents,
        "Summarize counts per sample for all samples, and generate interactive positional quality plots.\n\nSee 'qiime demux emp-single' for demultiplexing."
    );

    let option = hover(&at(text, 0, 25), &repository).unwrap();
    assert!(option.contents.starts_with("--i-data (input, required)"));
    assert!(option.contents.ends_with("The demultiplexed sequences to be summarized."));

    let lsp = to_lsp_hover(&option, &LineIndex::new(text));
    let HoverContents::Markup(markup) = lsp.contents else {
        panic!("expected markup contents");
    };
    assert_eq!(markup.value, option.contents);
    let range = lsp.range.unwrap();
    assert_eq!((range.start.character, range.end.character), (22, 30));
}
