//! # markdent
//!
//! Token-driven indentation and definition navigation for block-structured markup.
//!
//! File Layout
//!
//! The crate is organized leaf-first, the same way the computation flows:
//!
//! src/markdent
//!   ├── token        Token model shared by every stage
//!   ├── grammar      Declared bracket pairs, sigils, closer and literal delimiters
//!   ├── lexing       The `Tokenizer` seam and the default logos-backed lexer
//!   ├── document     Read-only snapshots and the editable document capability
//!   ├── literal      Literal-context detection for anchor candidates
//!   ├── nesting      Backward nesting resolution over a token span
//!   ├── indentation  The indentation calculator
//!   ├── navigation   Definition navigation
//!   └── commands     Editor-facing commands that commit results to a document
//!
//! For shared test fixtures, see the [testing module](crate::markdent::testing).

pub mod markdent;
