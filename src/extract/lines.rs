//! Logical lines: physical lines joined across `\` continuations.

use crate::document::TextRange;

/// One or more physical lines joined by trailing backslashes.
///
/// Each continuation backslash is replaced by a space, so the logical text
/// has the same byte length as the physical text it covers (minus line
/// breaks) and offsets map back piecewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    /// Document range from the first content byte to the end of the last
    /// physical line's content.
    pub range: TextRange,
    /// `(logical_start, document_start)` per contributing physical line.
    pieces: Vec<(usize, usize)>,
    /// Document offset of a trailing continuation with no line after it.
    pub dangling_continuation: Option<usize>,
}

impl LogicalLine {
    /// Map an offset in `text` (inclusive of `text.len()`) to a document offset.
    #[must_use]
    pub fn to_document(&self, logical: usize) -> usize {
        let idx = self
            .pieces
            .partition_point(|&(start, _)| start <= logical)
            .saturating_sub(1);
        let (logical_start, doc_start) = self.pieces[idx];
        doc_start + (logical - logical_start)
    }

    /// Map a document offset back into `text`, if this line covers it.
    #[must_use]
    pub fn to_logical(&self, document: usize) -> Option<usize> {
        if document < self.range.start || document > self.range.end {
            return None;
        }
        let idx = self
            .pieces
            .partition_point(|&(_, doc_start)| doc_start <= document)
            .saturating_sub(1);
        let (logical_start, doc_start) = self.pieces[idx];
        let piece_end = self
            .pieces
            .get(idx + 1)
            .map_or(self.text.len(), |&(next, _)| next);
        Some((logical_start + document.saturating_sub(doc_start)).min(piece_end))
    }

    /// Map a logical range to a document range.
    #[must_use]
    pub fn range_to_document(&self, start: usize, end: usize) -> TextRange {
        TextRange::new(self.to_document(start), self.to_document(end))
    }

    /// Number of physical lines joined into this one.
    #[must_use]
    pub fn physical_lines(&self) -> usize {
        self.pieces.len()
    }
}

/// Iterator over the logical lines of a text.
pub struct LogicalLines<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LogicalLines<'a> {
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Next physical line as `(content_start, content_end, next_pos)`.
    fn next_physical(&self, from: usize) -> Option<(usize, usize, usize)> {
        if from >= self.text.len() {
            return None;
        }
        let rest = &self.text[from..];
        let (mut end, next) = match rest.find('\n') {
            Some(idx) => (from + idx, from + idx + 1),
            None => (self.text.len(), self.text.len()),
        };
        if end > from && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        Some((from, end, next))
    }
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|&b| b == b'\\').count();
    trailing % 2 == 1
}

fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

impl Iterator for LogicalLines<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        let (first_start, first_end, mut next) = self.next_physical(self.pos)?;

        let mut text = String::new();
        let mut pieces = Vec::new();
        let mut dangling_continuation = None;
        let mut content = (first_start, first_end);
        let comment = is_comment_line(&self.text[first_start..first_end]);

        loop {
            let (start, end) = content;
            let line = &self.text[start..end];
            pieces.push((text.len(), start));

            if comment || !ends_with_continuation(line) {
                text.push_str(line);
                break;
            }

            text.push_str(&line[..line.len() - 1]);
            text.push(' ');

            match self.next_physical(next) {
                Some((s, e, n)) => {
                    content = (s, e);
                    next = n;
                }
                None => {
                    dangling_continuation = Some(end - 1);
                    break;
                }
            }
        }

        self.pos = next;
        let range_end = pieces
            .last()
            .map_or(first_end, |&(logical, doc)| doc + (text.len() - logical));
        Some(LogicalLine {
            text,
            range: TextRange::new(first_start, range_end),
            pieces,
            dangling_continuation,
        })
    }
}
