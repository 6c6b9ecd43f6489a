//! Shell-ish word splitting for one logical line.
//!
//! Handles single and double quotes, backslash escapes, unquoted `#`
//! comments, and the standalone separators `;`, `|`, `&&`, `||`. It is not a
//! shell grammar: expansions, redirections and heredocs are plain words.

/// A word with its quoting removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Unquoted text.
    pub text: String,
    /// Byte offsets into the logical line, `[start, end)`.
    pub start: usize,
    pub end: usize,
    /// Any part of the word was quoted or escaped.
    pub quoted: bool,
}

impl Token {
    /// An unquoted command separator.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        !self.quoted && matches!(self.text.as_str(), ";" | "|" | "&&" | "||")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    /// Offset of a quote that is never closed.
    pub unterminated_quote: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Single,
    Double,
}

#[must_use]
pub fn tokenize(line: &str) -> Tokenized {
    let mut out = Tokenized::default();
    let mut chars = line.char_indices().peekable();

    loop {
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let Some(&(start, first)) = chars.peek() else {
            break;
        };
        if first == '#' {
            break;
        }

        let mut text = String::new();
        let mut quoted = false;
        let mut state = State::Normal;
        let mut quote_start = start;
        let mut end = line.len();

        while let Some((idx, c)) = chars.next() {
            match state {
                State::Normal => match c {
                    c if c.is_whitespace() => {
                        end = idx;
                        break;
                    }
                    '\\' => {
                        quoted = true;
                        match chars.next() {
                            Some((_, escaped)) => text.push(escaped),
                            None => text.push('\\'),
                        }
                    }
                    '\'' => {
                        quoted = true;
                        quote_start = idx;
                        state = State::Single;
                    }
                    '"' => {
                        quoted = true;
                        quote_start = idx;
                        state = State::Double;
                    }
                    c => text.push(c),
                },
                State::Single => {
                    if c == '\'' {
                        state = State::Normal;
                    } else {
                        text.push(c);
                    }
                }
                State::Double => match c {
                    '"' => state = State::Normal,
                    '\\' => match chars.next() {
                        Some((_, escaped)) => text.push(escaped),
                        None => text.push('\\'),
                    },
                    c => text.push(c),
                },
            }
        }

        if state != State::Normal {
            out.unterminated_quote = Some(quote_start);
        }
        out.tokens.push(Token {
            text,
            start,
            end,
            quoted,
        });
        if out.unterminated_quote.is_some() {
            break;
        }
    }

    out
}
