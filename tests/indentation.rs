//! Indentation behaviour over small documents and the curated samples.

use markdent::markdent::testing::{assert_stable, calculator, doc, indentation_of, Samples};
use markdent::markdent::{
    indent_region, Document, EditableDocument, IndentConfig, IndentError, IndentationCalculator,
    TextDocument,
};
use rstest::rstest;

#[rstest]
#[case::comma_continuation_in_block(&["* outer", "  item, ", "  item2", "end"], 3, Some(2))]
#[case::bracket_opener_at_line_start(&["  (", "x"], 2, Some(4))]
#[case::brace_opener(&["* a", "  {", "x"], 3, Some(4))]
#[case::argument_alignment(&["call(a,", "x"], 2, Some(5))]
#[case::after_closed_block(&["  * a", "    b", "    end", "x"], 4, Some(2))]
#[case::after_nested_blocks(&["* a", "  * b", "    end", "  end", "x"], 5, Some(0))]
#[case::sigil_line_in_open_block(&["* a", "  b", "* c"], 3, Some(2))]
#[case::sigil_line_at_top(&["text", "## Heading"], 2, Some(0))]
#[case::trailing_operator(&["* a", "  x +", "y"], 3, Some(4))]
#[case::trailing_pipe(&["| a |", "y"], 2, Some(0))]
#[case::trailing_connective(&["a or", "b"], 2, Some(2))]
#[case::trailing_label(&["* a", "  Note:", "y"], 3, Some(4))]
#[case::modifier_sigil(&["text * more", "y"], 2, Some(0))]
#[case::symbol_sigil(&["x :*", "y"], 2, Some(0))]
#[case::endless_definition(&["* key = value", "y"], 2, Some(0))]
#[case::unterminated_string(&["* a", "  * b", "  \"open", "x"], 4, None)]
#[case::inside_fence(&["* a", "  ```", "  * b", "x"], 4, None)]
#[case::multi_backtick_span(&["* a", "  ``code", "x"], 3, None)]
#[case::prose_apostrophe(&["* a", "  the '90s were", "end", "* b", "  c", "d"], 6, Some(2))]
#[case::single_quoted_sigil(&["* a", "  say '* b' twice", "x"], 3, Some(2))]
#[case::after_fence(&["* a", "  ```", "  * b", "  ```", "x"], 5, Some(2))]
fn test_indentation(#[case] lines: &[&str], #[case] line: usize, #[case] expected: Option<usize>) {
    assert_eq!(indentation_of(lines, line), Ok(expected));
}

#[test]
fn test_lone_end_is_malformed() {
    let error = indentation_of(&["intro", "end", "after"], 3).unwrap_err();
    assert_eq!(
        error,
        IndentError::MalformedNesting {
            document: "test.md".to_string(),
            line: 2,
            token: "end".to_string(),
        }
    );
    insta::assert_snapshot!(error.to_string(), @"test.md:2: Unmatched end");
}

#[test]
fn test_crossed_nesting_is_malformed() {
    let error = indentation_of(&["* a", "  [b", "end]", "x"], 4).unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"test.md:2: Unmatched [");
}

#[test]
fn test_calculation_is_repeatable() {
    let document = doc(&["* a", "  b,", "  c"]);
    let calculator = calculator();
    let first = calculator.calculate_indentation(&document, 3);
    let second = calculator.calculate_indentation(&document, 3);
    assert_eq!(first, second);
}

#[test]
fn test_samples_are_stable() {
    let names = Samples::names();
    assert!(!names.is_empty());
    for name in names {
        assert_stable(&Samples::document(&name));
    }
}

#[rstest]
#[case("010-nested-lists.md")]
#[case("030-continuations.md")]
fn test_reindenting_flattened_sample(#[case] name: &str) {
    let expected = Samples::source(name);
    let flattened: Vec<&str> = expected.lines().map(str::trim_start).collect();
    let config = IndentConfig {
        indent_tabs_mode: false,
        ..IndentConfig::default()
    };
    let mut document = TextDocument::from_lines(name, &flattened).with_config(config);
    let calculator = IndentationCalculator::for_document(&document);
    let last = document.line_count();
    indent_region(&mut document, &calculator, 1, last).unwrap();
    assert_eq!(document.text(), expected.trim_end_matches('\n'));
    assert_eq!(document.cursor(), 0);
}
