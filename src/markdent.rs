//! Indentation and navigation over block-structured markup.
//!
//!     Both editor actions, "recompute the indentation of this line" and "jump to the next
//!     definition", are answered from a token stream instead of raw character patterns. The
//!     text is tokenized with a declared [grammar](grammar::Grammar) so that block delimiters
//!     that appear inside strings, code spans or fenced blocks, or in trailing modifier
//!     position, are never mistaken for structure.
//!
//! Pipeline
//!
//!     1. Anchor search. A backward regex search finds the nearest line that starts with a
//!        block sigil. Matches that fall inside an open literal are rejected by the
//!        [literal](literal) detector and the search continues before them.
//!
//!     2. Tokenization of the span between the anchor and the current line. See
//!        [lexing](lexing).
//!
//!     3. Nesting resolution. The [nesting](nesting) resolver scans the span backward with a
//!        stack of pending closers and reports the nearest unmatched opener.
//!
//!     4. Column derivation and continuation adjustments. See [indentation](indentation).
//!
//!     Nothing is cached between invocations: every call re-tokenizes what it needs.

pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod grammar;
pub mod indentation;
pub mod lexing;
pub mod literal;
pub mod location;
pub mod navigation;
pub mod nesting;
pub mod testing;
pub mod token;

pub use commands::{
    backward_definition, forward_definition, indent_line, indent_region, IndentOutcome,
};
pub use config::IndentConfig;
pub use document::{Document, EditableDocument, SearchMatch, TextDocument};
pub use error::{IndentError, NestingError};
pub use grammar::Grammar;
pub use indentation::IndentationCalculator;
pub use lexing::{SigilLexer, Tokenizer};
pub use navigation::{DefinitionNavigator, Destination};
pub use nesting::{EnclosingScope, NestingResolver};
pub use token::{CloseKind, KeywordRole, LiteralKind, OpenKind, Token, TokenKind};
