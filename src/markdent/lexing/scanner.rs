//! Mode machine that turns raw lexemes into classified tokens.
//!
//!     The raw layer cannot tell a `*` list marker from emphasis, or a quote from an apostrophe,
//!     because that depends on context. The scanner walks the source once and keeps the little
//!     context needed for that:
//!
//!         - literal modes: quoted strings (with `#{...}` interpolation frames), backtick code
//!           spans and fenced blocks are consumed as boundary and content tokens, so nothing
//!           inside them is ever classified as structure;
//!         - bracket depth, to tell a newline that ends a logical line from one that does not;
//!         - the tokens already emitted on the current line, for position-dependent keywords.
//!
//!     Unterminated literals run to the end of the input. The scanner never fails.

use super::base_tokenization::{next_raw, RawToken};
use crate::markdent::grammar::Grammar;
use crate::markdent::location::{leading_whitespace, LineIndex};
use crate::markdent::token::{CloseKind, KeywordRole, LiteralKind, OpenKind, Token, TokenKind};

/// An open `#{` inside a string, with the brace depth reached inside it.
#[derive(Debug)]
struct Interpolation {
    quote: char,
    depth: usize,
}

pub struct Scanner<'a> {
    grammar: &'a Grammar,
    source: &'a str,
    index: LineIndex,
    start_line: usize,
    pos: usize,
    tokens: Vec<Token>,
    interpolations: Vec<Interpolation>,
    bracket_depth: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a marker ending here is followed by whitespace or the end of its line.
fn stands_alone(next: Option<char>) -> bool {
    matches!(next, None | Some(' ' | '\t' | '\r' | '\n'))
}

impl<'a> Scanner<'a> {
    pub fn new(grammar: &'a Grammar, source: &'a str, start_line: usize) -> Self {
        Self {
            grammar,
            source,
            index: LineIndex::new(source),
            start_line,
            pos: 0,
            tokens: Vec::new(),
            interpolations: Vec::new(),
            bracket_depth: 0,
        }
    }

    pub fn run(mut self) -> Vec<Token> {
        while self.pos < self.source.len() {
            if self.interpolations.is_empty() && self.at_line_start() && self.scan_fence() {
                continue;
            }
            self.scan_code();
        }
        self.tokens
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.source.as_bytes()[self.pos - 1] == b'\n'
    }

    fn char_before(&self, offset: usize) -> Option<char> {
        self.source[..offset].chars().next_back()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.source.get(offset..).and_then(|rest| rest.chars().next())
    }

    /// Offset of the `\n` ending the line that contains `offset`, or the end of input.
    fn line_end(&self, offset: usize) -> usize {
        self.source[offset..]
            .find('\n')
            .map_or(self.source.len(), |rel| offset + rel)
    }

    /// Whether `quote` appears unescaped between `offset` and the end of its line.
    fn closes_on_line(&self, offset: usize, quote: char) -> bool {
        let mut chars = self.source[offset..self.line_end(offset)].chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                chars.next();
            } else if c == quote {
                return true;
            }
        }
        false
    }

    /// End of a line's content, excluding a carriage return before the newline.
    fn content_end(&self, offset: usize) -> usize {
        let end = self.line_end(offset);
        if end > offset && self.source.as_bytes()[end - 1] == b'\r' {
            end - 1
        } else {
            end
        }
    }

    fn push(&mut self, start: usize, end: usize, kind: TokenKind) {
        let position = self.index.position(self.source, start, self.start_line);
        self.tokens.push(Token::new(
            position.line,
            position.column,
            kind,
            &self.source[start..end],
        ));
    }

    fn emit(&mut self, start: usize, end: usize, kind: TokenKind) {
        self.push(start, end, kind);
        self.pos = end;
    }

    fn last_significant_on_line(&self) -> Option<&Token> {
        self.tokens
            .iter()
            .rev()
            .take_while(|token| !token.kind.is_line_break())
            .find(|token| token.kind != TokenKind::Space)
    }

    fn scan_code(&mut self) {
        let start = self.pos;
        let Some((raw, span)) = next_raw(&self.source[start..]) else {
            self.pos = self.source.len();
            return;
        };
        let end = start + span.end;
        match raw {
            Ok(RawToken::Whitespace) => self.emit(start, end, TokenKind::Space),
            Ok(RawToken::Newline) => {
                let kind = self.newline_kind();
                self.emit(start, end, kind);
            }
            Ok(RawToken::Word) => self.scan_word(start, end),
            Ok(RawToken::Operator) => self.scan_operator(start, end),
            Ok(RawToken::Hashes) => self.scan_hashes(start, end),
            Ok(RawToken::Dots) => {
                let kind = if end - start == 1 {
                    TokenKind::Period
                } else {
                    TokenKind::Text
                };
                self.emit(start, end, kind);
            }
            Ok(RawToken::Colons) => self.scan_colons(start, end),
            Ok(RawToken::Comma) => self.emit(start, end, TokenKind::Comma),
            Ok(RawToken::Backticks) => self.scan_code_span(start, end),
            Err(()) => self.scan_other(start, end),
        }
    }

    fn newline_kind(&self) -> TokenKind {
        if self.bracket_depth > 0 {
            return TokenKind::IgnoredNewline;
        }
        let continues = match self.last_significant_on_line() {
            None => true,
            Some(token) => match token.kind {
                TokenKind::OperatorOrPunct => !self.grammar.is_continuation_exempt(&token.text),
                TokenKind::Comma
                | TokenKind::Period
                | TokenKind::Keyword(KeywordRole::Connective)
                | TokenKind::OpenBracket(_)
                | TokenKind::SymbolBegin => true,
                _ => false,
            },
        };
        if continues {
            TokenKind::IgnoredNewline
        } else {
            TokenKind::Newline
        }
    }

    fn scan_word(&mut self, start: usize, end: usize) {
        let next = self.char_at(end);
        if next == Some(':') && self.char_at(end + 1) != Some(':') && stands_alone(self.char_at(end + 1))
        {
            self.emit(start, end + 1, TokenKind::Label);
            return;
        }
        let at_line_head = self.last_significant_on_line().is_none();
        if let Some(role) = self.grammar.keyword_role(&self.source[start..end]) {
            // A closer word in running text is just a word
            if role != KeywordRole::Closer || at_line_head {
                self.emit(start, end, TokenKind::Keyword(role));
                return;
            }
        }
        // Sentence punctuation stays with its word
        if next == Some('.') && stands_alone(self.char_at(end + 1)) {
            self.emit(start, end + 1, TokenKind::Text);
            return;
        }
        self.emit(start, end, TokenKind::Text);
    }

    fn scan_operator(&mut self, start: usize, end: usize) {
        let next = self.char_at(end);
        if self.grammar.keyword_role(&self.source[start..end]) == Some(KeywordRole::BlockSigil)
            && stands_alone(next)
        {
            self.emit(start, end, TokenKind::Keyword(KeywordRole::BlockSigil));
            return;
        }
        // Emphasis and inline symbols glued to words are text
        let glued = self.char_before(start).is_some_and(is_word_char)
            || next.is_some_and(is_word_char);
        let kind = if glued {
            TokenKind::Text
        } else {
            TokenKind::OperatorOrPunct
        };
        self.emit(start, end, kind);
    }

    fn scan_hashes(&mut self, start: usize, end: usize) {
        let kind = match self.grammar.keyword_role(&self.source[start..end]) {
            Some(KeywordRole::BlockSigil) if stands_alone(self.char_at(end)) => {
                TokenKind::Keyword(KeywordRole::BlockSigil)
            }
            _ => TokenKind::Text,
        };
        self.emit(start, end, kind);
    }

    fn scan_colons(&mut self, start: usize, end: usize) {
        let prev = self.char_before(start);
        let next = self.char_at(end);
        let starts_sigil = |c: char| {
            self.grammar
                .block_sigils
                .iter()
                .any(|sigil| sigil.starts_with(c))
        };
        let kind = if end - start == 1
            && !prev.is_some_and(is_word_char)
            && next.is_some_and(|c| is_word_char(c) || starts_sigil(c))
        {
            TokenKind::SymbolBegin
        } else if prev.is_some_and(is_word_char) || next.is_some_and(is_word_char) {
            TokenKind::Text
        } else {
            TokenKind::OperatorOrPunct
        };
        self.emit(start, end, kind);
    }

    fn scan_other(&mut self, start: usize, end: usize) {
        let Some(c) = self.char_at(start) else {
            self.pos = end;
            return;
        };
        if let Some(kind) = self.grammar.opening_bracket(c) {
            let kind = if kind == OpenKind::Brace && self.follows_lambda_arrow() {
                OpenKind::LambdaBegin
            } else {
                kind
            };
            self.bracket_depth += 1;
            if let Some(frame) = self.interpolations.last_mut() {
                frame.depth += 1;
            }
            self.emit(start, end, TokenKind::OpenBracket(kind));
        } else if let Some(kind) = self.grammar.closing_bracket(c) {
            self.bracket_depth = self.bracket_depth.saturating_sub(1);
            if let Some(frame) = self.interpolations.last_mut() {
                if frame.depth == 0 && kind == OpenKind::Brace {
                    let quote = frame.quote;
                    self.interpolations.pop();
                    self.emit(
                        start,
                        end,
                        TokenKind::CloseBracket(CloseKind::InterpolationEnd),
                    );
                    self.scan_string_body(quote);
                    return;
                }
                frame.depth = frame.depth.saturating_sub(1);
            }
            self.emit(start, end, TokenKind::CloseBracket(kind.closer()));
        } else if let Some(quote) = self.grammar.quote(c) {
            let prose = !quote.interpolates
                && (self.char_before(start).is_some_and(is_word_char)
                    || !self.closes_on_line(end, c));
            if prose {
                self.emit(start, end, TokenKind::Text);
            } else {
                self.emit(
                    start,
                    end,
                    TokenKind::StringBoundaryBegin(LiteralKind::Quote),
                );
                self.scan_string_body(c);
            }
        } else {
            self.emit(start, end, TokenKind::Text);
        }
    }

    fn follows_lambda_arrow(&self) -> bool {
        self.last_significant_on_line().is_some_and(|token| {
            token.kind == TokenKind::OperatorOrPunct && token.text == self.grammar.lambda_arrow
        })
    }

    /// Consume string content after an opening quote or a closed interpolation.
    fn scan_string_body(&mut self, quote: char) {
        let source = self.source;
        let grammar = self.grammar;
        let interpolates = grammar.quote(quote).is_some_and(|q| q.interpolates);
        let content_start = self.pos;
        let mut chars = source[content_start..].char_indices();
        while let Some((rel, c)) = chars.next() {
            let at = content_start + rel;
            if c == '\\' {
                chars.next();
                continue;
            }
            if c == quote {
                if content_start < at {
                    self.push(content_start, at, TokenKind::StringContent);
                }
                self.emit(
                    at,
                    at + c.len_utf8(),
                    TokenKind::StringBoundaryEnd(LiteralKind::Quote),
                );
                return;
            }
            if interpolates && source[at..].starts_with(grammar.interpolation_open.as_str()) {
                if content_start < at {
                    self.push(content_start, at, TokenKind::StringContent);
                }
                self.bracket_depth += 1;
                self.interpolations.push(Interpolation { quote, depth: 0 });
                self.emit(
                    at,
                    at + grammar.interpolation_open.len(),
                    TokenKind::OpenBracket(OpenKind::InterpolationBegin),
                );
                return;
            }
        }
        if content_start < source.len() {
            self.push(content_start, source.len(), TokenKind::StringContent);
        }
        self.pos = source.len();
    }

    /// Consume a backtick code span, the regex-like literal of the grammar.
    fn scan_code_span(&mut self, start: usize, end: usize) {
        if self.grammar.code_span != Some('`') {
            self.emit(start, end, TokenKind::Text);
            return;
        }
        let run = end - start;
        self.emit(start, end, TokenKind::StringBoundaryBegin(LiteralKind::Regex));
        let mut search = end;
        while let Some(rel) = self.source[search..].find('`') {
            let close_start = search + rel;
            let close_end = close_start
                + self.source[close_start..]
                    .bytes()
                    .take_while(|&b| b == b'`')
                    .count();
            if close_end - close_start == run {
                if end < close_start {
                    self.push(end, close_start, TokenKind::StringContent);
                }
                self.emit(
                    close_start,
                    close_end,
                    TokenKind::StringBoundaryEnd(LiteralKind::Regex),
                );
                return;
            }
            search = close_end;
        }
        if end < self.source.len() {
            self.push(end, self.source.len(), TokenKind::StringContent);
        }
        self.pos = self.source.len();
    }

    /// Consume a fenced block starting at the current line, if there is one.
    fn scan_fence(&mut self) -> bool {
        let line_start = self.pos;
        let line_end = self.content_end(line_start);
        let line = &self.source[line_start..line_end];
        let indent = leading_whitespace(line).len();
        let Some(fence_char) = line[indent..]
            .chars()
            .next()
            .filter(|c| self.grammar.fence_chars.contains(c))
        else {
            return false;
        };
        let run = line[indent..].chars().take_while(|&c| c == fence_char).count();
        if run < self.grammar.fence_min {
            return false;
        }

        if indent > 0 {
            self.push(line_start, line_start + indent, TokenKind::Space);
        }
        self.emit(
            line_start + indent,
            line_end,
            TokenKind::StringBoundaryBegin(LiteralKind::Heredoc),
        );
        let newline_end = self.line_end(line_start).saturating_add(1).min(self.source.len());
        if line_end < newline_end {
            self.emit(line_end, newline_end, TokenKind::Newline);
        }

        let content_start = self.pos;
        while self.pos < self.source.len() {
            let end = self.content_end(self.pos);
            if self.closes_fence(&self.source[self.pos..end], fence_char, run) {
                if content_start < self.pos {
                    self.push(content_start, self.pos, TokenKind::StringContent);
                }
                self.emit(
                    self.pos,
                    end,
                    TokenKind::StringBoundaryEnd(LiteralKind::Heredoc),
                );
                return true;
            }
            self.pos = (self.line_end(self.pos) + 1).min(self.source.len());
        }
        if content_start < self.pos {
            self.push(content_start, self.pos, TokenKind::StringContent);
        }
        true
    }

    fn closes_fence(&self, line: &str, fence_char: char, run: usize) -> bool {
        let body = line.trim_start_matches([' ', '\t']);
        let closing = body.chars().take_while(|&c| c == fence_char).count();
        closing >= run && body[closing * fence_char.len_utf8()..].trim().is_empty()
    }
}
