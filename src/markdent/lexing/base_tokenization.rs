//! Raw lexemes recognized by logos.
//!
//! This is the character-level layer. It knows nothing about strings, fences or keyword roles:
//! it only groups characters into runs that the [scanner](super::scanner) then classifies with
//! the grammar. Characters no pattern accepts (brackets, quotes and stray punctuation) come back
//! as errors and are classified one character at a time.

use logos::Logos;
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    // Words keep inner apostrophes (don't) and a trailing ? or !
    #[regex(r"[\p{L}\p{N}_]+(?:['’][\p{L}\p{N}_]+)*[!?]?")]
    Word,

    #[regex(r"[+\-*/%=<>&|^~\\@$;]+")]
    Operator,

    #[regex(r"#+")]
    Hashes,

    #[regex(r"\.+")]
    Dots,

    #[regex(r":+")]
    Colons,

    #[token(",")]
    Comma,

    #[regex(r"`+")]
    Backticks,
}

/// The first raw lexeme of `source`, with its byte range relative to `source`.
///
/// Unrecognized input yields `Err(())` covering exactly one character.
pub fn next_raw(source: &str) -> Option<(Result<RawToken, ()>, Range<usize>)> {
    let mut lexer = RawToken::lexer(source);
    match lexer.next()? {
        Ok(token) => Some((Ok(token), lexer.span())),
        Err(()) => {
            let start = lexer.span().start;
            let width = source[start..].chars().next().map_or(1, char::len_utf8);
            Some((Err(()), start..start + width))
        }
    }
}
