//! Error types for nesting resolution and indentation.

use std::fmt;

/// An opener whose required closer does not match the pending one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingError {
    /// Line of the offending token.
    pub line: usize,
    /// Text of the offending token.
    pub token: String,
}

impl NestingError {
    pub fn new(line: usize, token: impl Into<String>) -> Self {
        Self {
            line,
            token: token.into(),
        }
    }
}

impl fmt::Display for NestingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: Unmatched {}", self.line, self.token)
    }
}

impl std::error::Error for NestingError {}

/// Errors raised while computing indentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndentError {
    /// Openers and closers do not pair up. The text is left unmodified.
    MalformedNesting {
        document: String,
        line: usize,
        token: String,
    },
}

impl IndentError {
    pub fn malformed(document: &str, nesting: NestingError) -> Self {
        IndentError::MalformedNesting {
            document: document.to_string(),
            line: nesting.line,
            token: nesting.token,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            IndentError::MalformedNesting { line, .. } => *line,
        }
    }
}

impl fmt::Display for IndentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndentError::MalformedNesting {
                document,
                line,
                token,
            } => write!(f, "{}:{}: Unmatched {}", document, line, token),
        }
    }
}

impl std::error::Error for IndentError {}

impl From<IndentError> for String {
    fn from(err: IndentError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = IndentError::malformed("notes.md", NestingError::new(4, "end"));
        assert_eq!(error.to_string(), "notes.md:4: Unmatched end");
        assert_eq!(error.line(), 4);
        assert_eq!(NestingError::new(2, "(").to_string(), "2: Unmatched (");
    }
}
