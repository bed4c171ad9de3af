//! Token stream snapshots for representative lines.

use markdent::markdent::lexing::tokenize;
use markdent::markdent::testing::Samples;
use markdent::markdent::{Token, TokenKind};

fn summary(source: &str) -> String {
    tokenize(source)
        .iter()
        .filter(|token| token.kind != TokenKind::Space)
        .map(|token| format!("{:?}", token.kind))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_block_line() {
    insta::assert_snapshot!(
        summary("* item (x) end"),
        @"Keyword(BlockSigil) Text OpenBracket(Paren) Text CloseBracket(Paren) Text"
    );
}

#[test]
fn test_literals() {
    insta::assert_snapshot!(
        summary("Note: \"a #{b}\" `c`"),
        @"Label StringBoundaryBegin(Quote) StringContent OpenBracket(InterpolationBegin) Text CloseBracket(InterpolationEnd) StringBoundaryEnd(Quote) StringBoundaryBegin(Regex) StringContent StringBoundaryEnd(Regex)"
    );
}

#[test]
fn test_symbols_and_connectives() {
    insta::assert_snapshot!(
        summary("x :end and\n"),
        @"Text SymbolBegin Text Keyword(Connective) IgnoredNewline"
    );
}

#[test]
fn test_token_display() {
    let tokens = tokenize("  ## Title\n");
    let heading: &Token = &tokens[1];
    insta::assert_snapshot!(heading.to_string(), @r###"1:2 Keyword(BlockSigil) "##""###);
}

#[test]
fn test_samples_tokenize_to_known_definitions() {
    let tokens = tokenize(&Samples::source("020-headings-and-literals.md"));
    let keywords: Vec<(usize, &str)> = tokens
        .iter()
        .filter(|token| matches!(token.kind, TokenKind::Keyword(_)))
        .map(|token| (token.line, token.text.as_str()))
        .collect();
    assert_eq!(
        keywords,
        vec![(1, "#"), (7, "##"), (9, "and"), (10, "end"), (11, "end")]
    );
}
