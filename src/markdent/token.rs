//! Core token types shared by the lexer, the resolver and the navigator.
//!
//!     Tokens are produced in document order by a [Tokenizer](crate::markdent::lexing::Tokenizer)
//!     and are never shared across invocations. Each one records where it starts (1-based line,
//!     0-based character column) and the exact source text it covers, so that columns can be
//!     recomputed with tabs expanded when needed.
//!
//!     The kinds form a closed set that is just rich enough to drive nesting resolution. Keyword
//!     spellings are deliberately absent: the tokenizer assigns a [KeywordRole] from its grammar,
//!     and everything downstream only looks at the role.

use serde::Serialize;
use std::fmt;

/// Which bracket-like construct an opener starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OpenKind {
    Paren,
    Bracket,
    Brace,
    /// A brace that starts a lambda body (`-> {`).
    LambdaBegin,
    /// `#{` inside an interpolating string.
    InterpolationBegin,
}

/// Which bracket-like construct a closer ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CloseKind {
    Paren,
    Bracket,
    Brace,
    InterpolationEnd,
}

impl OpenKind {
    /// The closer that must match this opener.
    pub fn closer(self) -> CloseKind {
        match self {
            OpenKind::Paren => CloseKind::Paren,
            OpenKind::Bracket => CloseKind::Bracket,
            OpenKind::Brace | OpenKind::LambdaBegin => CloseKind::Brace,
            OpenKind::InterpolationBegin => CloseKind::InterpolationEnd,
        }
    }

    /// Plain grouping brackets, as opposed to lambda bodies and interpolations.
    pub fn is_grouping(self) -> bool {
        matches!(self, OpenKind::Paren | OpenKind::Bracket | OpenKind::Brace)
    }
}

/// The role a keyword plays in the grammar that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum KeywordRole {
    /// Opens a block that must be closed by the closer keyword.
    BlockSigil,
    /// Closes the innermost block sigil.
    Closer,
    /// A dangling logical connective (`and`, `or`).
    Connective,
    Other,
}

/// Flavour of a delimited literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LiteralKind {
    /// Quoted strings.
    Quote,
    /// Fenced blocks spanning whole lines.
    Heredoc,
    /// Code spans delimited by backtick runs.
    Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Keyword(KeywordRole),
    OperatorOrPunct,
    OpenBracket(OpenKind),
    CloseBracket(CloseKind),
    Comma,
    Period,
    Label,
    StringBoundaryBegin(LiteralKind),
    StringBoundaryEnd(LiteralKind),
    StringContent,
    Newline,
    /// A newline inside an unterminated logical line.
    IgnoredNewline,
    Space,
    SymbolBegin,
    /// Words, numbers and punctuation with no structural meaning.
    Text,
}

impl TokenKind {
    /// Whitespace and line breaks, which never decide structure on their own.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Space | TokenKind::Newline | TokenKind::IgnoredNewline
        )
    }

    pub fn is_line_break(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::IgnoredNewline)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub line: usize,
    pub column: usize,
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(line: usize, column: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            line,
            column,
            kind,
            text: text.into(),
        }
    }

    pub fn is_block_sigil(&self) -> bool {
        self.kind == TokenKind::Keyword(KeywordRole::BlockSigil)
    }

    pub fn is_closer(&self) -> bool {
        self.kind == TokenKind::Keyword(KeywordRole::Closer)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {:?} {:?}",
            self.line, self.column, self.kind, self.text
        )
    }
}

/// Index of the last token that is not trivia.
pub fn last_significant(tokens: &[Token]) -> Option<usize> {
    tokens.iter().rposition(|token| !token.kind.is_trivia())
}
