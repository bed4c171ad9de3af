//! Definition navigation.
//!
//!     A definition is a block sigil that opens a line: `* item`, `## Heading`. Sigils in
//!     modifier position or written as symbols are skipped, and so is anything inside literals,
//!     since the tokenizer never emits keywords there.
//!
//!     The navigator tokenizes the whole text and returns a [Destination]. Moving the cursor
//!     there is the job of [forward_definition](crate::markdent::commands::forward_definition)
//!     and [backward_definition](crate::markdent::commands::backward_definition).

use crate::markdent::lexing::{SigilLexer, Tokenizer};
use crate::markdent::nesting::is_definition;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Destination {
    Line(usize),
    /// Fewer definitions remained than requested going backward.
    DocumentStart,
    /// Fewer definitions remained than requested going forward.
    DocumentEnd,
}

#[derive(Debug, Clone, Default)]
pub struct DefinitionNavigator<T = SigilLexer> {
    tokenizer: T,
}

impl<T: Tokenizer> DefinitionNavigator<T> {
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    /// Lines of every definition, in document order.
    pub fn definition_lines(&self, text: &str) -> Vec<usize> {
        let tokens = self.tokenizer.tokenize(text, 1);
        (0..tokens.len())
            .filter(|&index| is_definition(&tokens, index))
            .map(|index| tokens[index].line)
            .collect()
    }

    /// The `count`-th definition after `current_line`.
    pub fn forward(&self, text: &str, current_line: usize, count: usize) -> Destination {
        let lines = self.definition_lines(text);
        let mut remaining = lines.into_iter();
        let mut line = current_line;
        for _ in 0..count {
            match remaining.find(|&candidate| candidate > line) {
                Some(found) => line = found,
                None => return Destination::DocumentEnd,
            }
        }
        Destination::Line(line)
    }

    /// The `count`-th definition before `current_line`.
    pub fn backward(&self, text: &str, current_line: usize, count: usize) -> Destination {
        let lines = self.definition_lines(text);
        let mut remaining = lines.into_iter().rev();
        let mut line = current_line;
        for _ in 0..count {
            match remaining.find(|&candidate| candidate < line) {
                Some(found) => line = found,
                None => return Destination::DocumentStart,
            }
        }
        Destination::Line(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "intro\n* one\n  text * inline\n## two\n```\n* fenced\n```\n* three\n";

    fn navigator() -> DefinitionNavigator {
        DefinitionNavigator::new(SigilLexer::markdown())
    }

    #[test]
    fn test_definition_lines() {
        assert_eq!(navigator().definition_lines(TEXT), vec![2, 4, 8]);
    }

    #[test]
    fn test_forward() {
        let nav = navigator();
        assert_eq!(nav.forward(TEXT, 1, 1), Destination::Line(2));
        assert_eq!(nav.forward(TEXT, 2, 1), Destination::Line(4));
        assert_eq!(nav.forward(TEXT, 1, 3), Destination::Line(8));
        assert_eq!(nav.forward(TEXT, 4, 2), Destination::DocumentEnd);
        assert_eq!(nav.forward(TEXT, 5, 0), Destination::Line(5));
    }

    #[test]
    fn test_backward() {
        let nav = navigator();
        assert_eq!(nav.backward(TEXT, 8, 1), Destination::Line(4));
        assert_eq!(nav.backward(TEXT, 9, 2), Destination::Line(4));
        assert_eq!(nav.backward(TEXT, 4, 2), Destination::DocumentStart);
    }

    #[test]
    fn test_no_definitions() {
        let nav = navigator();
        assert_eq!(nav.forward("plain\ntext\n", 1, 1), Destination::DocumentEnd);
        assert_eq!(nav.backward("plain\ntext\n", 2, 1), Destination::DocumentStart);
    }
}
