//! Where a cursor sits within a launcher invocation.

use crate::document::TextRange;
use crate::extract::lines::LogicalLines;
use crate::extract::tokenizer::{Token, tokenize};

/// The invocation slot a cursor word fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorSlot {
    Launcher,
    Plugin,
    Action,
    /// Options and their values.
    Argument,
}

impl CursorSlot {
    const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Launcher,
            1 => Self::Plugin,
            2 => Self::Action,
            _ => Self::Argument,
        }
    }
}

/// An unquoted word of the invocation, located in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorContext {
    pub slot: CursorSlot,
    /// Every word of the invocation, launcher first, including words after
    /// the cursor.
    pub words: Vec<Word>,
    /// Index into `words` of the word the cursor touches.
    pub current: Option<usize>,
    /// Raw text of the current word up to the cursor. Empty between words.
    pub prefix: String,
    /// Document range from the start of the current word to the cursor.
    pub replace: TextRange,
}

impl CursorContext {
    #[must_use]
    pub fn plugin(&self) -> Option<&str> {
        self.words.get(1).map(|w| w.text.as_str())
    }

    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.words.get(2).map(|w| w.text.as_str())
    }

    #[must_use]
    pub fn current_word(&self) -> Option<&Word> {
        self.current.and_then(|idx| self.words.get(idx))
    }

    /// Words after the action, except the one being typed.
    pub fn other_arguments(&self) -> impl Iterator<Item = &str> {
        self.words
            .iter()
            .enumerate()
            .skip(3)
            .filter(move |&(idx, _)| Some(idx) != self.current)
            .map(|(_, w)| w.text.as_str())
    }
}

/// Locate the invocation of `launcher` around byte `offset` of `text`.
///
/// Returns `None` when the cursor is not inside such an invocation, or is
/// inside a trailing comment or a separator.
#[must_use]
pub fn cursor_context(text: &str, offset: usize, launcher: &str) -> Option<CursorContext> {
    let line = LogicalLines::new(text)
        .find(|line| line.range.start <= offset && offset <= line.range.end)?;
    let cursor = line.to_logical(offset)?;
    let tokenized = tokenize(&line.text);

    let last_end = tokenized.tokens.last().map_or(0, |t| t.end);
    if cursor > last_end
        && line
            .text
            .get(last_end..cursor)
            .is_some_and(|rest| rest.contains('#'))
    {
        return None;
    }

    let mut segment: Vec<&Token> = Vec::new();
    for token in &tokenized.tokens {
        if token.is_separator() {
            if token.start >= cursor {
                break;
            }
            if token.end > cursor {
                return None;
            }
            segment.clear();
            continue;
        }
        segment.push(token);
    }

    let first = segment.first()?;
    if first.text != launcher || first.quoted {
        return None;
    }

    let current = segment
        .iter()
        .position(|t| t.start <= cursor && cursor <= t.end);
    let index = segment.iter().filter(|t| t.end < cursor).count();
    let word_start = current.map_or(cursor, |idx| segment[idx].start);
    let prefix = line.text.get(word_start..cursor).unwrap_or_default().to_string();

    let words = segment
        .iter()
        .map(|t| Word {
            text: t.text.clone(),
            range: line.range_to_document(t.start, t.end),
        })
        .collect();

    Some(CursorContext {
        slot: CursorSlot::from_index(index),
        words,
        current,
        prefix,
        replace: line.range_to_document(word_start, cursor),
    })
}
