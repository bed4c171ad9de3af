//! Testing utilities
//!
//!     Fixtures shared by the unit tests and the integration tests under `tests/`.
//!
//! Sample Files
//!
//!     Curated documents live in `samples/` at the crate root. Every line in them is indented
//!     the way the calculator would indent it, so they double as regression fixtures:
//!
//!     ```rust,ignore
//!     use markdent::markdent::testing::{assert_stable, Samples};
//!
//!     let doc = Samples::document("010-nested-lists.md");
//!     assert_stable(&doc);
//!     ```

use crate::markdent::document::{Document, TextDocument};
use crate::markdent::error::IndentError;
use crate::markdent::indentation::IndentationCalculator;
use crate::markdent::location::{leading_whitespace, space_width};
use std::fs;
use std::path::PathBuf;

pub struct Samples;

impl Samples {
    pub fn path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("samples")
            .join(name)
    }

    pub fn source(name: &str) -> String {
        let path = Self::path(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("cannot read sample {}: {}", path.display(), err))
    }

    pub fn document(name: &str) -> TextDocument {
        TextDocument::new(name, Self::source(name))
    }

    /// Names of all sample files, sorted.
    pub fn names() -> Vec<String> {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples");
        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap_or_else(|err| panic!("cannot list {}: {}", dir.display(), err))
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".md"))
            .collect();
        names.sort();
        names
    }
}

/// An in-memory document from lines joined with `\n`.
pub fn doc(lines: &[&str]) -> TextDocument {
    TextDocument::from_lines("test.md", lines)
}

/// Calculator with default settings.
pub fn calculator() -> IndentationCalculator {
    IndentationCalculator::default()
}

/// Calculated indentation of one line of `lines`.
pub fn indentation_of(lines: &[&str], line: usize) -> Result<Option<usize>, IndentError> {
    calculator().calculate_indentation(&doc(lines), line)
}

/// Lines whose current indentation differs from the calculated one, as
/// `(line, current, calculated)`. Blank lines and lines inside literals are skipped.
pub fn unstable_lines<D: Document>(doc: &D) -> Vec<(usize, usize, usize)> {
    let calculator = IndentationCalculator::for_document(doc);
    let tab_width = doc.config().tab_width;
    (1..=doc.line_count())
        .filter_map(|line| {
            let text = doc.line_text(line)?;
            if text.trim().is_empty() {
                return None;
            }
            let current = space_width(leading_whitespace(text), tab_width);
            match calculator.calculate_indentation(doc, line) {
                Ok(Some(calculated)) if calculated != current => Some((line, current, calculated)),
                Ok(_) => None,
                Err(err) => panic!("{}", err),
            }
        })
        .collect()
}

/// Assert every line of `doc` already has its calculated indentation.
pub fn assert_stable<D: Document>(doc: &D) {
    let unstable = unstable_lines(doc);
    assert!(
        unstable.is_empty(),
        "{}: lines not at their calculated indentation (line, current, calculated): {:?}",
        doc.name(),
        unstable
    );
}
