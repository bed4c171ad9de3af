//! Byte offset to line/column conversion.
//!
//!     Lines are 1-based everywhere in this crate, matching how editors report them. Columns are
//!     0-based and counted in characters, not bytes. Conversion is a binary search over the
//!     offsets where each line starts.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Offsets where each line of a text starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self { line_starts }
    }

    /// Number of lines. A trailing newline starts a final empty line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where a 1-based line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|index| self.line_starts.get(index))
            .copied()
    }

    /// 1-based line containing the byte offset.
    pub fn line_at(&self, byte_offset: usize) -> usize {
        self.line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1)
            + 1
    }

    /// Line and character column of a byte offset, with lines numbered from `first_line`.
    pub fn position(&self, source: &str, byte_offset: usize, first_line: usize) -> Position {
        let line = self.line_at(byte_offset);
        let start = self.line_starts[line - 1];
        let column = source[start..byte_offset].chars().count();
        Position::new(first_line + line - 1, column)
    }
}

/// Display width of a whitespace prefix, each tab counting as `tab_width` columns.
pub fn space_width(whitespace: &str, tab_width: usize) -> usize {
    whitespace
        .chars()
        .map(|c| if c == '\t' { tab_width } else { 1 })
        .sum()
}

/// Display column of the character at `column` in `line_text`.
pub fn display_column(line_text: &str, column: usize, tab_width: usize) -> usize {
    let prefix: String = line_text.chars().take(column).collect();
    space_width(&prefix, tab_width)
}

/// The run of spaces and tabs a line starts with.
pub fn leading_whitespace(line_text: &str) -> &str {
    let end = line_text
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line_text.len());
    &line_text[..end]
}
