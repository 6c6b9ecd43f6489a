//! Locating `qiime <plugin> <action> --option value ...` invocations in
//! shell-script text.
//!
//! Extraction starts from scratch on every call and keeps no state between
//! calls. Problems in the script text never abort extraction; they mark the
//! affected invocation [`Malformed`] and the next line is scanned as usual.

pub mod lines;
pub mod tokenizer;

use std::fmt;

use tracing::debug;

use crate::document::{DocumentSnapshot, TextRange};
use crate::options::normalize;

use lines::{LogicalLine, LogicalLines};
use tokenizer::{Token, tokenize};

pub const DEFAULT_LAUNCHER: &str = "qiime";

/// Flags that may follow the launcher directly instead of a plugin.
const ROOT_FLAGS: &[&str] = &["--help", "-h", "--version"];

/// A word of the invocation, located in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceToken {
    pub text: String,
    pub range: TextRange,
}

/// One option as written, with the value that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionArg {
    /// The option token exactly as unquoted, e.g. `--p-depth` or `--p-depth=5`.
    pub raw: String,
    /// Empty when nothing followed the option.
    pub value: String,
    pub range: TextRange,
    pub value_range: Option<TextRange>,
}

impl OptionArg {
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value_range.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    UnterminatedQuote,
    OptionInPluginSlot,
    DanglingContinuation,
    EmptyOptionName,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedQuote => write!(f, "unterminated quote"),
            Self::OptionInPluginSlot => write!(f, "expected a plugin name, found an option"),
            Self::DanglingContinuation => write!(f, "line continuation at end of file"),
            Self::EmptyOptionName => write!(f, "option has no name"),
        }
    }
}

/// Why and where an invocation could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed {
    pub reason: MalformedReason,
    pub range: TextRange,
}

/// One located command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub uri: String,
    pub version: i32,
    pub launcher: SourceToken,
    pub plugin: SourceToken,
    pub action: Option<SourceToken>,
    pub options: Vec<OptionArg>,
    /// Covers every token of the invocation and any malformed marker.
    pub range: TextRange,
    pub malformed: Option<Malformed>,
}

impl Invocation {
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    /// Where diagnostics about the command as a whole are anchored.
    #[must_use]
    pub fn anchor(&self) -> TextRange {
        self.action.as_ref().map_or(self.plugin.range, |a| a.range)
    }
}

/// Finds invocations of one launcher keyword.
#[derive(Debug, Clone)]
pub struct Extractor {
    launcher: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_LAUNCHER)
    }
}

impl Extractor {
    pub fn new(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }

    #[must_use]
    pub fn launcher(&self) -> &str {
        &self.launcher
    }

    /// Lazily yield every invocation in `snapshot`.
    pub fn extract<'a>(
        &'a self,
        snapshot: &'a DocumentSnapshot,
    ) -> impl Iterator<Item = Invocation> + 'a {
        LogicalLines::new(&snapshot.text).flat_map(move |line| self.scan_line(snapshot, &line))
    }

    fn scan_line(&self, snapshot: &DocumentSnapshot, line: &LogicalLine) -> Vec<Invocation> {
        let tokenized = tokenize(&line.text);
        if tokenized.tokens.is_empty() {
            return Vec::new();
        }

        let segments: Vec<&[Token]> = tokenized
            .tokens
            .split(Token::is_separator)
            .collect();
        let last_segment = segments.len() - 1;

        let mut found = Vec::new();
        for (idx, segment) in segments.into_iter().enumerate() {
            let is_last = idx == last_segment;
            let trailing = if is_last {
                trailing_malformed(line, tokenized.unterminated_quote)
            } else {
                None
            };
            if let Some(invocation) = self.build(snapshot, line, segment, trailing) {
                debug!(
                    uri = %snapshot.uri,
                    plugin = %invocation.plugin.text,
                    range = %invocation.range,
                    malformed = invocation.is_malformed(),
                    "extracted invocation"
                );
                found.push(invocation);
            }
        }
        found
    }

    fn build(
        &self,
        snapshot: &DocumentSnapshot,
        line: &LogicalLine,
        segment: &[Token],
        trailing: Option<Malformed>,
    ) -> Option<Invocation> {
        let [launcher, plugin, rest @ ..] = segment else {
            return None;
        };
        if launcher.text != self.launcher || launcher.quoted {
            return None;
        }
        if ROOT_FLAGS.contains(&plugin.text.as_str()) {
            return None;
        }

        let locate = |token: &Token| SourceToken {
            text: token.text.clone(),
            range: line.range_to_document(token.start, token.end),
        };

        let launcher = locate(launcher);
        let plugin_token = locate(plugin);
        let mut malformed = trailing;
        let mut range = launcher.range.cover(&plugin_token.range);

        if is_option_token(&plugin.text) {
            malformed.get_or_insert(Malformed {
                reason: MalformedReason::OptionInPluginSlot,
                range: plugin_token.range,
            });
        }

        let mut action = None;
        let mut options: Vec<OptionArg> = Vec::new();
        let mut iter = rest.iter().peekable();
        while let Some(token) = iter.next() {
            let located = locate(token);
            range = range.cover(&located.range);

            if !is_option_token(&token.text) {
                if action.is_none() && options.is_empty() {
                    action = Some(located);
                }
                // Other positional words are not part of any signature.
                continue;
            }

            if normalize(&token.text).is_unrecognized() {
                malformed.get_or_insert(Malformed {
                    reason: MalformedReason::EmptyOptionName,
                    range: located.range,
                });
                continue;
            }

            let mut option = OptionArg {
                raw: token.text.clone(),
                value: String::new(),
                range: located.range,
                value_range: None,
            };
            if let Some((_, inline)) = token.text.split_once('=') {
                // Bare `--opt=` records no value; `--opt=""` does.
                if !inline.is_empty() || token.quoted {
                    option.value = inline.to_string();
                    option.value_range = Some(located.range);
                }
            } else if let Some(next) = iter.next_if(|next| !is_option_token(&next.text)) {
                let value = locate(next);
                range = range.cover(&value.range);
                option.value = value.text;
                option.value_range = Some(value.range);
            }
            options.push(option);
        }

        if let Some(marker) = &malformed {
            range = range.cover(&marker.range);
        }

        Some(Invocation {
            uri: snapshot.uri.clone(),
            version: snapshot.version,
            launcher,
            plugin: plugin_token,
            action,
            options,
            range,
            malformed,
        })
    }
}

fn is_option_token(text: &str) -> bool {
    text.starts_with("--") || text == "-h"
}

fn trailing_malformed(line: &LogicalLine, unterminated_quote: Option<usize>) -> Option<Malformed> {
    if let Some(quote) = unterminated_quote {
        return Some(Malformed {
            reason: MalformedReason::UnterminatedQuote,
            range: line.range_to_document(quote, line.text.len()),
        });
    }
    line.dangling_continuation.map(|offset| Malformed {
        reason: MalformedReason::DanglingContinuation,
        range: TextRange::new(offset, offset + 1),
    })
}

/// Lazily extract with the default `qiime` launcher.
pub fn extract(snapshot: &DocumentSnapshot) -> impl Iterator<Item = Invocation> + '_ {
    let extractor = Extractor::default();
    LogicalLines::new(&snapshot.text).flat_map(move |line| extractor.scan_line(snapshot, &line))
}
