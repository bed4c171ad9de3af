//! In-memory document backed by a `String`.

use super::{Document, EditableDocument};
use crate::markdent::config::IndentConfig;
use crate::markdent::location::LineIndex;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct TextDocument {
    name: String,
    text: String,
    index: LineIndex,
    cursor: usize,
    config: IndentConfig,
}

impl TextDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            name: name.into(),
            index: LineIndex::new(&text),
            text,
            cursor: 0,
            config: IndentConfig::default(),
        }
    }

    /// A document made of `lines` joined with newlines.
    pub fn from_lines(name: impl Into<String>, lines: &[&str]) -> Self {
        Self::new(name, lines.join("\n"))
    }

    pub fn with_config(mut self, config: IndentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Snap an offset down to the nearest character boundary within the text.
    fn clamp(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

impl Document for TextDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn config(&self) -> &IndentConfig {
        &self.config
    }

    fn line_count(&self) -> usize {
        self.index.line_count()
    }

    fn line_start(&self, line: usize) -> Option<usize> {
        self.index.line_start(line)
    }

    fn line_at(&self, offset: usize) -> usize {
        self.index.line_at(self.clamp(offset))
    }
}

impl EditableDocument for TextDocument {
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = self.clamp(offset);
    }

    fn replace(&mut self, range: Range<usize>, replacement: &str) {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end.max(start));
        self.text.replace_range(start..end, replacement);
        self.index = LineIndex::new(&self.text);
        self.cursor = if self.cursor >= end {
            self.cursor - (end - start) + replacement.len()
        } else if self.cursor > start {
            start + (self.cursor - start).min(replacement.len())
        } else {
            self.cursor
        };
        self.cursor = self.clamp(self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_line_queries() {
        let doc = TextDocument::new("a.md", "* one\r\n  two\nend");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_text(1), Some("* one"));
        assert_eq!(doc.line_text(2), Some("  two"));
        assert_eq!(doc.line_text(3), Some("end"));
        assert_eq!(doc.line_text(4), None);
        assert_eq!(doc.line_at(8), 2);
    }

    #[test]
    fn test_searches() {
        let doc = TextDocument::from_lines("a.md", &["* one", "text", "  * two", "more"]);
        let pattern = Regex::new(r"(?m)^([ \t]*)\*[ \t]").unwrap();
        let found = doc.search_backward(&pattern, doc.text().len()).unwrap();
        assert_eq!(found.start, doc.line_start(3).unwrap());
        assert_eq!(found.capture(doc.text(), 1), Some("  "));
        let earlier = doc.search_backward(&pattern, found.start).unwrap();
        assert_eq!(earlier.start, 0);
        assert!(doc.search_backward(&pattern, 0).is_none());

        let next = doc.search_forward(&pattern, 1).unwrap();
        assert_eq!(next.start, found.start);
        assert!(doc.looking_at(&pattern, 0));
        assert!(!doc.looking_at(&pattern, 1));
    }

    #[test]
    fn test_replace_keeps_cursor_on_text() {
        let mut doc = TextDocument::from_lines("a.md", &["* a", "    b"]);
        doc.set_cursor(doc.text().len());
        let start = doc.line_start(2).unwrap();
        doc.replace(start..start + 4, "  ");
        assert_eq!(doc.text(), "* a\n  b");
        assert_eq!(doc.cursor(), doc.text().len());
    }

    #[test]
    fn test_save_excursion_and_goto() {
        let mut doc = TextDocument::from_lines("a.md", &["one", "two", "three"]);
        let line = doc.save_excursion(|doc| {
            doc.goto_line(3);
            doc.current_line()
        });
        assert_eq!(line, 3);
        assert_eq!(doc.cursor(), 0);
        doc.goto_line(9);
        assert_eq!(doc.cursor(), doc.text().len());
    }
}
