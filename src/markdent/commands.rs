//! Editor commands.
//!
//!     Each command runs one pure computation and then commits its result to an
//!     [EditableDocument]: a single whitespace replacement for indentation, a single cursor move
//!     for navigation. On error the document is left as it was.

use crate::markdent::config::IndentConfig;
use crate::markdent::document::EditableDocument;
use crate::markdent::error::IndentError;
use crate::markdent::indentation::IndentationCalculator;
use crate::markdent::lexing::Tokenizer;
use crate::markdent::location::{leading_whitespace, space_width};
use crate::markdent::navigation::{DefinitionNavigator, Destination};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndentOutcome {
    /// Leading whitespace was rewritten. Widths are display columns.
    Reindented { from: usize, to: usize },
    /// The line already had the computed indentation.
    Unchanged,
    /// The line starts inside a literal and was left alone.
    Suppressed,
}

/// Reindent the line the cursor is on.
///
/// A cursor inside the old indentation ends up at the end of the new one. Anywhere else it
/// stays on the same text.
pub fn indent_line<D, T>(
    doc: &mut D,
    calculator: &IndentationCalculator<T>,
) -> Result<IndentOutcome, IndentError>
where
    D: EditableDocument,
    T: Tokenizer,
{
    let line = doc.current_line();
    match calculator.calculate_indentation(&*doc, line)? {
        None => Ok(IndentOutcome::Suppressed),
        Some(width) => Ok(apply_indentation(doc, line, width, calculator.config(), true)),
    }
}

/// Reindent lines `first..=last` top-down, leaving blank lines empty.
///
/// Each line is computed against the text as already reindented above it. Stops at the first
/// error, keeping the lines reindented so far.
pub fn indent_region<D, T>(
    doc: &mut D,
    calculator: &IndentationCalculator<T>,
    first: usize,
    last: usize,
) -> Result<Vec<(usize, IndentOutcome)>, IndentError>
where
    D: EditableDocument,
    T: Tokenizer,
{
    let last = last.min(doc.line_count());
    let mut outcomes = Vec::new();
    for line in first.max(1)..=last {
        let blank = doc
            .line_text(line)
            .map_or(true, |text| text.trim().is_empty());
        let outcome = if blank {
            apply_indentation(doc, line, 0, calculator.config(), false)
        } else {
            match calculator.calculate_indentation(&*doc, line)? {
                None => IndentOutcome::Suppressed,
                Some(width) => apply_indentation(doc, line, width, calculator.config(), false),
            }
        };
        log::debug!("line {}: {:?}", line, outcome);
        outcomes.push((line, outcome));
    }
    Ok(outcomes)
}

fn apply_indentation<D: EditableDocument>(
    doc: &mut D,
    line: usize,
    width: usize,
    config: &IndentConfig,
    move_cursor: bool,
) -> IndentOutcome {
    let Some(start) = doc.line_start(line) else {
        return IndentOutcome::Unchanged;
    };
    let current = leading_whitespace(doc.line_text(line).unwrap_or("")).to_string();
    let desired = config.indent_string(width);
    let cursor = doc.cursor();
    let in_indentation = cursor >= start && cursor <= start + current.len();

    let outcome = if current == desired {
        IndentOutcome::Unchanged
    } else {
        doc.replace(start..start + current.len(), &desired);
        IndentOutcome::Reindented {
            from: space_width(&current, config.tab_width),
            to: width,
        }
    };
    if move_cursor && in_indentation {
        doc.set_cursor(start + desired.len());
    }
    outcome
}

/// Move past the `count`-th next definition.
pub fn forward_definition<D, T>(
    doc: &mut D,
    navigator: &DefinitionNavigator<T>,
    count: usize,
) -> Destination
where
    D: EditableDocument,
    T: Tokenizer,
{
    let destination = navigator.forward(doc.text(), doc.current_line(), count);
    move_to(doc, destination);
    destination
}

/// Move back to the `count`-th previous definition.
pub fn backward_definition<D, T>(
    doc: &mut D,
    navigator: &DefinitionNavigator<T>,
    count: usize,
) -> Destination
where
    D: EditableDocument,
    T: Tokenizer,
{
    let destination = navigator.backward(doc.text(), doc.current_line(), count);
    move_to(doc, destination);
    destination
}

/// Put the cursor at the destination, past any whitespace that follows it.
fn move_to<D: EditableDocument>(doc: &mut D, destination: Destination) {
    let end = doc.text().len();
    let offset = match destination {
        Destination::Line(line) => doc.line_start(line).unwrap_or(end),
        Destination::DocumentStart => 0,
        Destination::DocumentEnd => end,
    };
    let skipped: usize = doc
        .substring(offset..end)
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    doc.set_cursor(offset + skipped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdent::document::{Document, TextDocument};
    use crate::markdent::lexing::SigilLexer;

    fn spaces() -> IndentationCalculator {
        IndentationCalculator::markdown(IndentConfig {
            indent_tabs_mode: false,
            ..IndentConfig::default()
        })
    }

    #[test]
    fn test_indent_line_rewrites_whitespace() {
        let mut doc = TextDocument::from_lines("a.md", &["* a", "b"]);
        doc.goto_line(2);
        let outcome = indent_line(&mut doc, &spaces()).unwrap();
        assert_eq!(outcome, IndentOutcome::Reindented { from: 0, to: 2 });
        assert_eq!(doc.text(), "* a\n  b");
        assert_eq!(doc.cursor(), 6);

        let again = indent_line(&mut doc, &spaces()).unwrap();
        assert_eq!(again, IndentOutcome::Unchanged);
        assert_eq!(doc.text(), "* a\n  b");
    }

    #[test]
    fn test_indent_line_keeps_cursor_on_text() {
        let mut doc = TextDocument::from_lines("a.md", &["* a", "      bcd"]);
        doc.set_cursor(doc.text().len() - 1);
        indent_line(&mut doc, &spaces()).unwrap();
        assert_eq!(doc.text(), "* a\n  bcd");
        assert_eq!(&doc.text()[doc.cursor()..], "d");
    }

    #[test]
    fn test_indent_line_uses_tabs() {
        let mut doc = TextDocument::from_lines("a.md", &["* a", "  * b", "    * c", "d"]);
        doc.goto_line(4);
        let calculator = IndentationCalculator::markdown(IndentConfig {
            indent_width: 4,
            tab_width: 4,
            indent_tabs_mode: true,
        });
        indent_line(&mut doc, &calculator).unwrap();
        assert_eq!(doc.line_text(4), Some("\t\td"));
    }

    #[test]
    fn test_suppressed_and_errors_leave_text() {
        let mut doc = TextDocument::from_lines("a.md", &["say \"open", "  x"]);
        doc.goto_line(2);
        assert_eq!(
            indent_line(&mut doc, &spaces()).unwrap(),
            IndentOutcome::Suppressed
        );
        assert_eq!(doc.text(), "say \"open\n  x");

        let mut doc = TextDocument::from_lines("a.md", &["x", "end", "  y"]);
        doc.goto_line(3);
        assert!(indent_line(&mut doc, &spaces()).is_err());
        assert_eq!(doc.text(), "x\nend\n  y");
    }

    #[test]
    fn test_indent_region() {
        let mut doc = TextDocument::from_lines(
            "a.md",
            &["* a", "b", "   ", "* c", "d", "end", "end", "e"],
        );
        let outcomes = indent_region(&mut doc, &spaces(), 1, 8).unwrap();
        assert_eq!(doc.text(), "* a\n  b\n\n  * c\n    d\n    end\n  end\ne");
        assert_eq!(outcomes.len(), 8);
        assert_eq!(outcomes[1], (2, IndentOutcome::Reindented { from: 0, to: 2 }));
    }

    #[test]
    fn test_definition_commands() {
        let mut doc = TextDocument::from_lines("a.md", &["intro", "  * one", "text", "## two"]);
        let navigator = DefinitionNavigator::new(SigilLexer::markdown());

        assert_eq!(
            forward_definition(&mut doc, &navigator, 1),
            Destination::Line(2)
        );
        assert_eq!(&doc.text()[doc.cursor()..doc.cursor() + 1], "*");

        assert_eq!(
            forward_definition(&mut doc, &navigator, 5),
            Destination::DocumentEnd
        );
        assert_eq!(doc.cursor(), doc.text().len());

        assert_eq!(
            backward_definition(&mut doc, &navigator, 1),
            Destination::Line(2)
        );
        assert_eq!(
            backward_definition(&mut doc, &navigator, 1),
            Destination::DocumentStart
        );
        assert_eq!(doc.cursor(), 0);
    }
}
