//! Declared grammar driving the lexer and the structural analysis.
//!
//!     The analysis only needs a handful of facts about the text it works on: which bracket pairs
//!     exist, which markers open blocks, which keyword closes them, which words are dangling
//!     connectives and how literals are delimited. They are collected here as plain data so a
//!     different markup dialect can be supported by declaring a new [Grammar] instead of touching
//!     the resolver.
//!
//!     [Grammar::markdown] is the default dialect: `*` list markers and `#`..`######` headings
//!     open blocks, a line-leading `end` closes them.

use crate::markdent::token::{KeywordRole, OpenKind};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPair {
    pub open: char,
    pub close: char,
    pub kind: OpenKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDelimiter {
    pub quote: char,
    /// Whether `interpolation_open` starts an embedded expression inside this quote.
    pub interpolates: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub brackets: Vec<BracketPair>,
    pub block_sigils: Vec<String>,
    pub closer: String,
    pub connectives: Vec<String>,
    pub keywords: Vec<String>,
    /// Operator that turns a block sigil into a one-line definition.
    pub endless_marker: Option<String>,
    /// Trailing operators that do not continue the logical line.
    pub continuation_exempt: Vec<String>,
    /// Operator whose following brace opens a lambda body.
    pub lambda_arrow: String,
    pub quotes: Vec<QuoteDelimiter>,
    pub interpolation_open: String,
    pub fence_chars: Vec<char>,
    pub fence_min: usize,
    pub code_span: Option<char>,
}

impl Grammar {
    pub fn markdown() -> Self {
        let mut block_sigils = vec!["*".to_string()];
        block_sigils.extend((1..=6).map(|level| "#".repeat(level)));
        Grammar {
            brackets: vec![
                BracketPair {
                    open: '(',
                    close: ')',
                    kind: OpenKind::Paren,
                },
                BracketPair {
                    open: '[',
                    close: ']',
                    kind: OpenKind::Bracket,
                },
                BracketPair {
                    open: '{',
                    close: '}',
                    kind: OpenKind::Brace,
                },
            ],
            block_sigils,
            closer: "end".to_string(),
            connectives: vec!["and".to_string(), "or".to_string()],
            keywords: vec!["not".to_string()],
            endless_marker: Some("=".to_string()),
            continuation_exempt: vec!["|".to_string()],
            lambda_arrow: "->".to_string(),
            quotes: vec![
                QuoteDelimiter {
                    quote: '"',
                    interpolates: true,
                },
                QuoteDelimiter {
                    quote: '\'',
                    interpolates: false,
                },
            ],
            interpolation_open: "#{".to_string(),
            fence_chars: vec!['`', '~'],
            fence_min: 3,
            code_span: Some('`'),
        }
    }

    /// Role of a word or marker, if the grammar treats it as a keyword.
    ///
    /// Position-dependent rules (a closer only counts at the start of a line, a sigil must be
    /// followed by whitespace) are applied by the lexer on top of this.
    pub fn keyword_role(&self, text: &str) -> Option<KeywordRole> {
        if self.block_sigils.iter().any(|sigil| sigil == text) {
            Some(KeywordRole::BlockSigil)
        } else if self.closer == text {
            Some(KeywordRole::Closer)
        } else if self.connectives.iter().any(|word| word == text) {
            Some(KeywordRole::Connective)
        } else if self.keywords.iter().any(|word| word == text) {
            Some(KeywordRole::Other)
        } else {
            None
        }
    }

    pub fn opening_bracket(&self, c: char) -> Option<OpenKind> {
        self.brackets.iter().find(|pair| pair.open == c).map(|pair| pair.kind)
    }

    pub fn closing_bracket(&self, c: char) -> Option<OpenKind> {
        self.brackets.iter().find(|pair| pair.close == c).map(|pair| pair.kind)
    }

    pub fn quote(&self, c: char) -> Option<&QuoteDelimiter> {
        self.quotes.iter().find(|quote| quote.quote == c)
    }

    pub fn is_endless_marker(&self, text: &str) -> bool {
        self.endless_marker.as_deref() == Some(text)
    }

    pub fn is_continuation_exempt(&self, text: &str) -> bool {
        self.continuation_exempt.iter().any(|op| op == text)
    }

    /// Line pattern for "optional indentation followed by a block sigil".
    ///
    /// Capture group 1 is the leading whitespace. Longer sigils are tried first so `##` is not
    /// read as `#` followed by text.
    pub fn sigil_line_pattern(&self) -> Regex {
        let mut sigils: Vec<&str> = self.block_sigils.iter().map(String::as_str).collect();
        sigils.sort_by_key(|sigil| std::cmp::Reverse(sigil.len()));
        let alternatives = sigils
            .iter()
            .map(|sigil| regex::escape(sigil))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?m)^([ \t]*)(?:{})(?:[ \t]|\r?$)", alternatives))
            .expect("escaped sigil alternatives always form a valid pattern")
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::markdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_roles() {
        let grammar = Grammar::markdown();
        assert_eq!(grammar.keyword_role("*"), Some(KeywordRole::BlockSigil));
        assert_eq!(grammar.keyword_role("###"), Some(KeywordRole::BlockSigil));
        assert_eq!(grammar.keyword_role("#######"), None);
        assert_eq!(grammar.keyword_role("end"), Some(KeywordRole::Closer));
        assert_eq!(grammar.keyword_role("or"), Some(KeywordRole::Connective));
        assert_eq!(grammar.keyword_role("not"), Some(KeywordRole::Other));
        assert_eq!(grammar.keyword_role("item"), None);
    }

    #[test]
    fn test_sigil_line_pattern() {
        let pattern = Grammar::markdown().sigil_line_pattern();
        let captures = pattern.captures("\t  * item").unwrap();
        assert_eq!(&captures[1], "\t  ");
        assert!(pattern.is_match("## Heading"));
        assert!(pattern.is_match("*"));
        assert!(!pattern.is_match("**bold** text"));
        assert!(!pattern.is_match("#hashtag"));
        assert!(!pattern.is_match("text * more"));
    }

    #[test]
    fn test_brackets() {
        let grammar = Grammar::markdown();
        assert_eq!(grammar.opening_bracket('['), Some(OpenKind::Bracket));
        assert_eq!(grammar.closing_bracket('}'), Some(OpenKind::Brace));
        assert_eq!(grammar.opening_bracket(')'), None);
    }
}
