//! Indentation calculation.
//!
//!     The column for a line is derived from the nearest structural anchor before it:
//!
//!         1. The first line is always at column 0.
//!         2. Search backward for a line starting with a block sigil, skipping matches that
//!            sit inside a literal. Its leading whitespace is the provisional base. With no
//!            such line the span starts at the top of the document with base 0.
//!         3. Tokenize from the anchor to the start of the current line. If that text ends
//!            inside a literal, the line is left alone (`Ok(None)`).
//!         4. Resolve the nearest unmatched opener. An opener puts the line one unit right of
//!            the opener's line (or of the first line of a comma-continued list leading up to
//!            it). Without an opener, each unmatched closer keyword dedents one unit.
//!         5. A line that itself starts with a sigil steps back one unit, and continuation
//!            lines (trailing operator, connective, period, label, or a comma outside a
//!            grouping bracket) step forward one unit.
//!
//!     A `(` with content after it on its own line aligns the following line with that content
//!     instead.
//!
//!     The calculator is pure: it reads a [Document] and returns a column. Committing the result
//!     is up to the [commands](crate::markdent::commands).

use crate::markdent::config::IndentConfig;
use crate::markdent::document::Document;
use crate::markdent::error::IndentError;
use crate::markdent::lexing::{SigilLexer, Tokenizer};
use crate::markdent::literal::in_literal;
use crate::markdent::location::{display_column, leading_whitespace, space_width};
use crate::markdent::nesting::NestingResolver;
use crate::markdent::token::{last_significant, KeywordRole, OpenKind, Token, TokenKind};
use regex::Regex;

/// Where the scanned span starts and what it contributes to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentationContext {
    /// Width of the anchor line's leading whitespace.
    pub base_indentation: usize,
    /// Line of the anchor sigil, `None` when the span starts at the top of the document.
    pub anchor_line: Option<usize>,
    pub anchor_offset: usize,
    pub extra_pending_closers: usize,
}

impl IndentationContext {
    fn document_start() -> Self {
        Self {
            base_indentation: 0,
            anchor_line: None,
            anchor_offset: 0,
            extra_pending_closers: 0,
        }
    }

    fn first_line(&self) -> usize {
        self.anchor_line.unwrap_or(1)
    }
}

pub struct IndentationCalculator<T = SigilLexer> {
    tokenizer: T,
    config: IndentConfig,
    sigil_line: Regex,
}

impl IndentationCalculator<SigilLexer> {
    pub fn markdown(config: IndentConfig) -> Self {
        Self::new(SigilLexer::markdown(), config)
    }

    /// A markdown calculator configured from the document's own settings.
    pub fn for_document<D: Document + ?Sized>(doc: &D) -> Self {
        Self::markdown(doc.config().clone())
    }
}

impl Default for IndentationCalculator<SigilLexer> {
    fn default() -> Self {
        Self::markdown(IndentConfig::default())
    }
}

impl<T: Tokenizer> IndentationCalculator<T> {
    pub fn new(tokenizer: T, config: IndentConfig) -> Self {
        let sigil_line = tokenizer.grammar().sigil_line_pattern();
        Self {
            tokenizer,
            config,
            sigil_line,
        }
    }

    pub fn config(&self) -> &IndentConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Column `line` should be indented to.
    ///
    /// `Ok(None)` means the start of the line lies inside a literal (or past the end of the
    /// document) and its indentation must not be touched.
    pub fn calculate_indentation<D: Document + ?Sized>(
        &self,
        doc: &D,
        line: usize,
    ) -> Result<Option<usize>, IndentError> {
        if line <= 1 {
            return Ok(Some(0));
        }
        let Some(line_start) = doc.line_start(line) else {
            return Ok(None);
        };
        let starts_with_sigil = doc
            .line_text(line)
            .is_some_and(|text| self.sigil_line.is_match(text));

        let mut context = self.find_anchor(doc, line_start);
        let span = doc.substring(context.anchor_offset..line_start);
        let tokens = self.tokenizer.tokenize(span, context.first_line());
        let last = last_significant(&tokens).map(|index| &tokens[index]);
        if last.is_some_and(leaves_literal_open) {
            log::debug!("line {} starts inside a literal", line);
            return Ok(None);
        }

        let scope = NestingResolver::new(self.tokenizer.grammar())
            .find_enclosing_scope(&tokens)
            .map_err(|error| IndentError::malformed(doc.name(), error))?;
        context.extra_pending_closers = scope.extra_pending_closers;
        log::debug!("line {}: {:?}, {:?}", line, context, scope);

        let unit = self.config.indent_width as isize;
        let opener = scope.opener.map(|index| &tokens[index]);
        let mut indentation = match scope.opener {
            Some(index) => {
                if let Some(column) = self.argument_column(doc, &tokens, index) {
                    return Ok(Some(column));
                }
                (self.opener_base(doc, tokens[index].line) as isize) + unit
            }
            None => {
                if let Some(index) = scope.first_unmatched_closer {
                    if !self.has_earlier_anchor(doc, &context) {
                        let closer = &tokens[index];
                        return Err(IndentError::MalformedNesting {
                            document: doc.name().to_string(),
                            line: closer.line,
                            token: closer.text.clone(),
                        });
                    }
                }
                context.base_indentation as isize
                    - (context.extra_pending_closers as isize) * unit
            }
        };
        if starts_with_sigil {
            indentation -= unit;
        }
        if starts_with_sigil || self.continues_line(last, opener) {
            indentation += unit;
        }
        Ok(Some(indentation.max(0) as usize))
    }

    /// Nearest sigil line before `before` that is not inside a literal.
    fn find_anchor<D: Document + ?Sized>(&self, doc: &D, before: usize) -> IndentationContext {
        let mut limit = before;
        while let Some(found) = doc.search_backward(&self.sigil_line, limit) {
            if in_literal(&self.tokenizer, doc.substring(0..found.start)) {
                log::trace!("anchor candidate at {} is inside a literal", found.start);
                limit = found.start;
                continue;
            }
            let whitespace = found.capture(doc.text(), 1).unwrap_or("");
            return IndentationContext {
                base_indentation: space_width(whitespace, self.config.tab_width),
                anchor_line: Some(doc.line_at(found.start)),
                anchor_offset: found.start,
                extra_pending_closers: 0,
            };
        }
        IndentationContext::document_start()
    }

    /// Whether a sigil line outside any literal precedes the anchor, so that an opener for an
    /// unmatched closer in the span may still exist before it.
    fn has_earlier_anchor<D: Document + ?Sized>(
        &self,
        doc: &D,
        context: &IndentationContext,
    ) -> bool {
        context.anchor_line.is_some()
            && self
                .find_anchor(doc, context.anchor_offset)
                .anchor_line
                .is_some()
    }

    /// Column just right of a `(` that has content after it on its own line.
    fn argument_column<D: Document + ?Sized>(
        &self,
        doc: &D,
        tokens: &[Token],
        opener: usize,
    ) -> Option<usize> {
        let token = &tokens[opener];
        if token.kind != TokenKind::OpenBracket(OpenKind::Paren) {
            return None;
        }
        let has_content = tokens[opener + 1..]
            .iter()
            .take_while(|next| !next.kind.is_line_break())
            .any(|next| !next.kind.is_trivia());
        if !has_content {
            return None;
        }
        let text = doc.line_text(token.line)?;
        Some(display_column(text, token.column, self.config.tab_width) + 1)
    }

    /// Indentation of the opener's line, or of the first line of the comma-continued list that
    /// leads up to it.
    fn opener_base<D: Document + ?Sized>(&self, doc: &D, opener_line: usize) -> usize {
        let mut line = opener_line;
        while let Some(previous) = previous_non_blank(doc, line) {
            let ends_with_comma = doc
                .line_text(previous)
                .is_some_and(|text| text.trim_end().ends_with(','));
            if !ends_with_comma {
                break;
            }
            line = previous;
        }
        let text = doc.line_text(line).unwrap_or("");
        space_width(leading_whitespace(text), self.config.tab_width)
    }

    fn continues_line(&self, last: Option<&Token>, opener: Option<&Token>) -> bool {
        let Some(last) = last else {
            return false;
        };
        match last.kind {
            TokenKind::OperatorOrPunct => {
                !self.tokenizer.grammar().is_continuation_exempt(&last.text)
            }
            TokenKind::Keyword(KeywordRole::Connective) | TokenKind::Period | TokenKind::Label => {
                true
            }
            // Commas inside a grouping bracket or directly in a block separate items on
            // lines of equal rank
            TokenKind::Comma => match opener.map(|token| token.kind) {
                None => true,
                Some(TokenKind::OpenBracket(kind)) => !kind.is_grouping(),
                Some(_) => false,
            },
            _ => false,
        }
    }
}

/// Whether a span ending with `token` leaves a literal open.
///
/// A code span only closes on a backtick run as long as the one that opened it, so its end
/// boundary always terminates the literal, whatever its length.
fn leaves_literal_open(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::StringBoundaryBegin(_) | TokenKind::StringContent
    )
}

fn previous_non_blank<D: Document + ?Sized>(doc: &D, line: usize) -> Option<usize> {
    (1..line)
        .rev()
        .find(|&candidate| doc.line_text(candidate).is_some_and(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdent::document::TextDocument;

    fn indentation(lines: &[&str], line: usize) -> Result<Option<usize>, IndentError> {
        let doc = TextDocument::from_lines("test.md", lines);
        IndentationCalculator::markdown(IndentConfig::default()).calculate_indentation(&doc, line)
    }

    #[test]
    fn test_first_line_is_zero() {
        assert_eq!(indentation(&["    * a"], 1), Ok(Some(0)));
    }

    #[test]
    fn test_block_content() {
        assert_eq!(indentation(&["* outer", "x"], 2), Ok(Some(2)));
        assert_eq!(indentation(&["* a", "  * b", "x"], 3), Ok(Some(4)));
        assert_eq!(indentation(&["\t* a", "x"], 2), Ok(Some(10)));
    }

    #[test]
    fn test_after_closed_block() {
        assert_eq!(indentation(&["  * a", "    b", "  end", "x"], 4), Ok(Some(2)));
        assert_eq!(
            indentation(&["* a", "  * b", "    c", "  end", "end", "x"], 6),
            Ok(Some(0))
        );
    }

    #[test]
    fn test_comma_continuation_in_block() {
        assert_eq!(
            indentation(&["* outer", "  item, ", "  item2", "end"], 3),
            Ok(Some(2))
        );
    }

    #[test]
    fn test_comma_continuation_outside_block() {
        assert_eq!(indentation(&["a,", "b"], 2), Ok(Some(2)));
        assert_eq!(indentation(&["[a,", "b"], 2), Ok(Some(2)));
    }

    #[test]
    fn test_comma_continued_opener_line() {
        assert_eq!(
            indentation(&["  first,", "  second, (", "x"], 3),
            Ok(Some(4))
        );
    }

    #[test]
    fn test_brackets() {
        assert_eq!(indentation(&["  call(", "x"], 2), Ok(Some(4)));
        assert_eq!(indentation(&["  call(a,", "x"], 2), Ok(Some(7)));
        assert_eq!(indentation(&["list [", "x"], 2), Ok(Some(2)));
    }

    #[test]
    fn test_sigil_line_inside_block() {
        assert_eq!(indentation(&["* outer", "* inner"], 2), Ok(Some(2)));
        assert_eq!(indentation(&["text", "* item"], 2), Ok(Some(0)));
    }

    #[test]
    fn test_continuation_tokens() {
        assert_eq!(indentation(&["a +", "b"], 2), Ok(Some(2)));
        assert_eq!(indentation(&["a |", "b"], 2), Ok(Some(0)));
        assert_eq!(indentation(&["a and", "b"], 2), Ok(Some(2)));
        assert_eq!(indentation(&["Note:", "b"], 2), Ok(Some(2)));
        assert_eq!(indentation(&["a .", "b"], 2), Ok(Some(2)));
        assert_eq!(indentation(&["a", "b"], 2), Ok(Some(0)));
    }

    #[test]
    fn test_inside_literals() {
        assert_eq!(indentation(&["* a", "say \"open", "x"], 3), Ok(None));
        assert_eq!(indentation(&["```", "* x", "y"], 3), Ok(None));
        assert_eq!(indentation(&["use ``code", "x"], 2), Ok(None));
    }

    #[test]
    fn test_closed_code_span_at_line_end() {
        assert_eq!(indentation(&["* a", "  see ``x``", "y"], 3), Ok(Some(2)));
        assert_eq!(indentation(&["* a", "  see `x`", "y"], 3), Ok(Some(2)));
    }

    #[test]
    fn test_anchor_inside_literal_is_skipped() {
        assert_eq!(
            indentation(&["* a", "  \"text", "* b\"", "  x"], 4),
            Ok(Some(2))
        );
    }

    #[test]
    fn test_lone_closer_is_malformed() {
        let error = indentation(&["text", "end", "more"], 3).unwrap_err();
        assert_eq!(error.to_string(), "test.md:2: Unmatched end");
        assert_eq!(indentation(&["text", "end"], 2), Ok(Some(0)));
    }

    #[test]
    fn test_unmatched_closer_after_first_block() {
        for lines in [
            &["* a", "end", "end", "x"][..],
            &["", "* a", "end", "end", "x"][..],
            &["intro", "* a", "end", "end", "x"][..],
        ] {
            let error = indentation(lines, lines.len()).unwrap_err();
            assert_eq!(error.line(), lines.len() - 1);
        }
    }

    #[test]
    fn test_unmatched_closer_with_earlier_block_dedents() {
        assert_eq!(
            indentation(&["* a", "  * b", "  end", "  end", "x"], 5),
            Ok(Some(0))
        );
    }

    #[test]
    fn test_mismatched_brackets_are_malformed() {
        let error = indentation(&["* a", "  (b", "end)", "x"], 4).unwrap_err();
        assert_eq!(error.line(), 2);
    }

    #[test]
    fn test_past_end_is_untouched() {
        assert_eq!(indentation(&["a", "b"], 7), Ok(None));
    }
}
