//! Text-buffer capabilities the analysis is written against.
//!
//!     [Document] is a read-only snapshot: every computation in this crate takes one and returns
//!     a plain value. Only the command layer needs [EditableDocument], and it uses it once per
//!     command to commit the final edit or cursor move.
//!
//!     Offsets are byte offsets into [Document::text]. Lines are 1-based.

pub mod text_document;

use crate::markdent::config::IndentConfig;
use regex::Regex;
use std::ops::Range;

pub use text_document::TextDocument;

/// A regex match with the byte ranges of its capture groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
    /// Group 0 is the whole match. Groups that did not participate are `None`.
    pub captures: Vec<Option<Range<usize>>>,
}

impl SearchMatch {
    fn from_captures(captures: &regex::Captures<'_>, offset: usize) -> Self {
        let whole = captures.get(0).map_or(0..0, |m| m.range());
        Self {
            start: offset + whole.start,
            end: offset + whole.end,
            captures: captures
                .iter()
                .map(|group| group.map(|m| offset + m.start()..offset + m.end()))
                .collect(),
        }
    }

    /// Text of a capture group.
    pub fn capture<'t>(&self, text: &'t str, group: usize) -> Option<&'t str> {
        self.captures
            .get(group)
            .cloned()
            .flatten()
            .and_then(|range| text.get(range))
    }
}

pub trait Document {
    /// Name used in error messages, usually a path.
    fn name(&self) -> &str;

    fn text(&self) -> &str;

    fn config(&self) -> &IndentConfig;

    fn line_count(&self) -> usize;

    /// Byte offset where a line starts, `None` past the last line.
    fn line_start(&self, line: usize) -> Option<usize>;

    /// Line containing a byte offset.
    fn line_at(&self, offset: usize) -> usize;

    /// Text of a line without its line terminator.
    fn line_text(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map_or(self.text().len(), |next| next - 1);
        let text = &self.text()[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    fn substring(&self, range: Range<usize>) -> &str {
        let end = range.end.min(self.text().len());
        self.text().get(range.start.min(end)..end).unwrap_or("")
    }

    /// Last match of `pattern` that lies entirely before `before`.
    fn search_backward(&self, pattern: &Regex, before: usize) -> Option<SearchMatch> {
        let haystack = self.substring(0..before);
        pattern
            .captures_iter(haystack)
            .last()
            .map(|captures| SearchMatch::from_captures(&captures, 0))
    }

    /// First match of `pattern` starting at or after `from`.
    fn search_forward(&self, pattern: &Regex, from: usize) -> Option<SearchMatch> {
        let from = from.min(self.text().len());
        let haystack = self.substring(from..self.text().len());
        pattern
            .captures(haystack)
            .map(|captures| SearchMatch::from_captures(&captures, from))
    }

    /// Whether `pattern` matches starting exactly at `offset`.
    fn looking_at(&self, pattern: &Regex, offset: usize) -> bool {
        let rest = self.substring(offset..self.text().len());
        pattern.find(rest).is_some_and(|m| m.start() == 0)
    }
}

/// A document with a cursor that commands can move and edit.
pub trait EditableDocument: Document {
    fn cursor(&self) -> usize;

    /// Move the cursor, clamped to the end of the text.
    fn set_cursor(&mut self, offset: usize);

    /// Replace a byte range. A cursor after the range keeps its place in the text.
    fn replace(&mut self, range: Range<usize>, replacement: &str);

    fn current_line(&self) -> usize {
        self.line_at(self.cursor())
    }

    /// Move the cursor to the start of a line, or to the end of the text past the last line.
    fn goto_line(&mut self, line: usize) {
        let offset = self.line_start(line.max(1)).unwrap_or(self.text().len());
        self.set_cursor(offset);
    }

    /// Run `f`, then put the cursor back on the same line and byte column.
    ///
    /// The position is kept by line rather than by offset, so edits `f` makes to other lines do
    /// not move it onto different text.
    fn save_excursion<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T
    where
        Self: Sized,
    {
        let line = self.current_line();
        let column = self.cursor() - self.line_start(line).unwrap_or(0);
        let result = f(self);
        let start = self.line_start(line).unwrap_or(self.text().len());
        let width = self.line_text(line).map_or(0, str::len);
        self.set_cursor(start + column.min(width));
        result
    }
}
