//! Lexer
//!
//! This module turns markup text into the token stream the analysis works on.
//!
//! Structure:
//!     The tokenization is done in two passes:
//! 1. Raw lexemes using the logos lexer ./base_tokenization.rs
//! 2. Classification by a mode machine driven by the [Grammar] ./scanner.rs
//!    - literals (strings, code spans, fenced blocks) become boundary and content tokens
//!    - keyword roles are assigned from the grammar
//!    - newlines are split into logical and ignored ones
//!
//! Consumers depend on the [Tokenizer] trait, not on [SigilLexer], so a different lexer can be
//! plugged into the calculator and the navigator.

pub mod base_tokenization;
pub mod scanner;

use crate::markdent::grammar::Grammar;
use crate::markdent::token::Token;
use once_cell::sync::Lazy;
use scanner::Scanner;

static MARKDOWN: Lazy<SigilLexer> = Lazy::new(SigilLexer::markdown);

/// Source of the token stream.
///
/// Implementations are pure and deterministic: they never fail, whatever the input, and number
/// lines starting from `start_line`.
pub trait Tokenizer {
    fn tokenize(&self, text: &str, start_line: usize) -> Vec<Token>;

    /// The grammar the tokens were classified with.
    fn grammar(&self) -> &Grammar;
}

/// Grammar-driven best-effort lexer.
#[derive(Debug, Clone, Default)]
pub struct SigilLexer {
    grammar: Grammar,
}

impl SigilLexer {
    pub fn new(grammar: Grammar) -> Self {
        Self { grammar }
    }

    pub fn markdown() -> Self {
        Self::new(Grammar::markdown())
    }
}

impl Tokenizer for SigilLexer {
    fn tokenize(&self, text: &str, start_line: usize) -> Vec<Token> {
        let tokens = Scanner::new(&self.grammar, text, start_line).run();
        log::trace!(
            "tokenized {} bytes from line {} into {} tokens",
            text.len(),
            start_line,
            tokens.len()
        );
        tokens
    }

    fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

/// Tokenize with the default markdown grammar.
pub fn tokenize(text: &str) -> Vec<Token> {
    MARKDOWN.tokenize(text, 1)
}
