//! Indentation settings threaded explicitly into the calculator and the commands.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndentConfig {
    /// Columns added per nesting level.
    pub indent_width: usize,
    /// Columns a tab counts for.
    pub tab_width: usize,
    /// Whether written indentation uses tabs where a full tab fits.
    pub indent_tabs_mode: bool,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            tab_width: 8,
            indent_tabs_mode: true,
        }
    }
}

impl IndentConfig {
    /// Whitespace that indents a line to `width` columns.
    pub fn indent_string(&self, width: usize) -> String {
        if self.indent_tabs_mode && self.tab_width > 0 {
            let mut indentation = "\t".repeat(width / self.tab_width);
            indentation.push_str(&" ".repeat(width % self.tab_width));
            indentation
        } else {
            " ".repeat(width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_string() {
        let config = IndentConfig::default();
        assert_eq!(config.indent_string(0), "");
        assert_eq!(config.indent_string(4), "    ");
        assert_eq!(config.indent_string(10), "\t  ");

        let spaces = IndentConfig {
            indent_tabs_mode: false,
            ..IndentConfig::default()
        };
        assert_eq!(spaces.indent_string(10), " ".repeat(10));
    }
}
