//! Literal-context detection.
//!
//!     A position is inside a literal when the token stream of the text before it leaves a
//!     string, code span or fenced block open. Interpolation is tracked as its own frame: code
//!     inside `"#{...}"` is not literal text, even though a string is open around it.

use crate::markdent::lexing::Tokenizer;
use crate::markdent::token::{CloseKind, OpenKind, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Literal,
    Interpolation,
}

/// Whether a token stream ends inside an unterminated literal.
pub fn ends_inside_literal(tokens: &[Token]) -> bool {
    let mut frames = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::StringBoundaryBegin(_) => frames.push(Frame::Literal),
            TokenKind::StringBoundaryEnd(_) => {
                if frames.last() == Some(&Frame::Literal) {
                    frames.pop();
                }
            }
            TokenKind::OpenBracket(OpenKind::InterpolationBegin) => {
                frames.push(Frame::Interpolation)
            }
            TokenKind::CloseBracket(CloseKind::InterpolationEnd) => {
                if frames.last() == Some(&Frame::Interpolation) {
                    frames.pop();
                }
            }
            _ => {}
        }
    }
    frames.last() == Some(&Frame::Literal)
}

/// Whether the end of `prefix` lies inside a literal.
pub fn in_literal<T: Tokenizer + ?Sized>(tokenizer: &T, prefix: &str) -> bool {
    ends_inside_literal(&tokenizer.tokenize(prefix, 1))
}
