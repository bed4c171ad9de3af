//! Nesting resolution.
//!
//!     Given the tokens between an anchor and the current line, find the nearest opener that is
//!     still unmatched at the end of the span. The span is scanned backward with an owned stack
//!     of pending closers: a closer pushes, an opener pops the closer it requires, and the first
//!     opener met with an empty stack is the enclosing scope.
//!
//!     Only token kinds and keyword roles are inspected. The one grammar fact consulted is the
//!     endless-definition marker, which is an operator rather than a keyword.

use crate::markdent::error::NestingError;
use crate::markdent::grammar::Grammar;
use crate::markdent::token::{CloseKind, KeywordRole, Token, TokenKind};

/// Result of a backward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnclosingScope {
    /// Index of the nearest unmatched opener, if any.
    pub opener: Option<usize>,
    /// Closer keywords left unmatched when the scan ran out of tokens.
    pub extra_pending_closers: usize,
    /// Earliest of those unmatched closer keywords.
    pub first_unmatched_closer: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Bracket(CloseKind),
    Closer(usize),
}

pub struct NestingResolver<'g> {
    grammar: &'g Grammar,
}

impl<'g> NestingResolver<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    pub fn find_enclosing_scope(&self, tokens: &[Token]) -> Result<EnclosingScope, NestingError> {
        let mut stack: Vec<Pending> = Vec::new();
        for index in (0..tokens.len()).rev() {
            let token = &tokens[index];
            match token.kind {
                TokenKind::CloseBracket(kind) => stack.push(Pending::Bracket(kind)),
                TokenKind::OpenBracket(kind) => match stack.last() {
                    None => return Ok(Self::opened_at(index)),
                    Some(Pending::Bracket(pending)) if *pending == kind.closer() => {
                        stack.pop();
                    }
                    Some(_) => return Err(NestingError::new(token.line, token.text.as_str())),
                },
                TokenKind::Keyword(_) if is_symbol(tokens, index) => {}
                TokenKind::Keyword(KeywordRole::BlockSigil) => {
                    if !self.opens_block(tokens, index) {
                        log::trace!("skipping non-opening sigil at {}", token);
                        continue;
                    }
                    match stack.last() {
                        None => return Ok(Self::opened_at(index)),
                        Some(Pending::Closer(_)) => {
                            stack.pop();
                        }
                        Some(Pending::Bracket(_)) => {
                            return Err(NestingError::new(token.line, token.text.as_str()))
                        }
                    }
                }
                TokenKind::Keyword(KeywordRole::Closer) => stack.push(Pending::Closer(index)),
                _ => {}
            }
        }

        let closers: Vec<usize> = stack
            .iter()
            .filter_map(|pending| match pending {
                Pending::Closer(index) => Some(*index),
                Pending::Bracket(_) => None,
            })
            .collect();
        Ok(EnclosingScope {
            opener: None,
            extra_pending_closers: closers.len(),
            first_unmatched_closer: closers.last().copied(),
        })
    }

    fn opened_at(index: usize) -> EnclosingScope {
        EnclosingScope {
            opener: Some(index),
            ..EnclosingScope::default()
        }
    }

    /// Whether the block sigil at `index` opens a block that needs a closer.
    pub fn opens_block(&self, tokens: &[Token], index: usize) -> bool {
        !in_modifier_position(tokens, index) && !self.is_endless(tokens, index)
    }

    /// A sigil followed on its own line by the endless marker at bracket depth 0.
    fn is_endless(&self, tokens: &[Token], index: usize) -> bool {
        let mut depth = 0usize;
        for token in tokens[index + 1..]
            .iter()
            .take_while(|token| !token.kind.is_line_break())
        {
            match token.kind {
                TokenKind::OpenBracket(_) => depth += 1,
                TokenKind::CloseBracket(_) => depth = depth.saturating_sub(1),
                TokenKind::OperatorOrPunct
                    if depth == 0 && self.grammar.is_endless_marker(&token.text) =>
                {
                    return true
                }
                _ => {}
            }
        }
        false
    }
}

/// Whether the keyword at `index` is written as a symbol, as in `:*`.
pub fn is_symbol(tokens: &[Token], index: usize) -> bool {
    index > 0 && tokens[index - 1].kind == TokenKind::SymbolBegin
}

/// Whether the keyword at `index` trails other content on its physical line.
///
/// Opening brackets, operators and commas may precede an opener, so `(* x` or `> * x` still
/// open a block.
pub fn in_modifier_position(tokens: &[Token], index: usize) -> bool {
    let line = tokens[index].line;
    tokens[..index]
        .iter()
        .rev()
        .take_while(|token| token.line == line && !token.kind.is_line_break())
        .filter(|token| !token.kind.is_trivia())
        .any(|token| {
            !matches!(
                token.kind,
                TokenKind::OpenBracket(_) | TokenKind::OperatorOrPunct | TokenKind::Comma
            )
        })
}

/// Whether the token at `index` is a definition sigil for navigation.
pub fn is_definition(tokens: &[Token], index: usize) -> bool {
    tokens[index].is_block_sigil()
        && !is_symbol(tokens, index)
        && !in_modifier_position(tokens, index)
}
