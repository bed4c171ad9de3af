//! Subcommand implementations
//!
//! Each handler works on source text already read from disk and returns the text to print, so
//! the handlers can be tested without spawning the binary.

use markdent::markdent::lexing::tokenize;
use markdent::markdent::{
    backward_definition, forward_definition, indent_region, DefinitionNavigator, Destination,
    Document, EditableDocument, IndentConfig, IndentOutcome, IndentationCalculator, SigilLexer,
    TextDocument,
};

/// Token output formats
pub const TOKEN_FORMATS: &[&str] = &["json", "simple"];

fn document(name: &str, source: &str, config: &IndentConfig) -> TextDocument {
    TextDocument::new(name, source).with_config(config.clone())
}

/// Column a single line should be indented to, or `none` inside a literal.
pub fn indent(name: &str, source: &str, line: usize, config: &IndentConfig) -> Result<String, String> {
    let doc = document(name, source, config);
    if line == 0 || line > doc.line_count() {
        return Err(format!("{}: no line {}", name, line));
    }
    let calculator = IndentationCalculator::for_document(&doc);
    match calculator.calculate_indentation(&doc, line)? {
        Some(column) => Ok(format!("{}\n", column)),
        None => Ok("none\n".to_string()),
    }
}

/// Reindent every line, returning the new text and the number of lines that changed.
pub fn reindent(name: &str, source: &str, config: &IndentConfig) -> Result<(String, usize), String> {
    let mut doc = document(name, source, config);
    let calculator = IndentationCalculator::for_document(&doc);
    let last = doc.line_count();
    let outcomes = indent_region(&mut doc, &calculator, 1, last)?;
    let changed = outcomes
        .iter()
        .filter(|(_, outcome)| matches!(outcome, IndentOutcome::Reindented { .. }))
        .count();
    log::info!("{}: reindented {} of {} lines", name, changed, outcomes.len());
    Ok((doc.into_text(), changed))
}

/// Line reached by jumping `count` definitions from `line`.
pub fn definition(
    name: &str,
    source: &str,
    line: usize,
    count: usize,
    backward: bool,
) -> Result<String, String> {
    let mut doc = TextDocument::new(name, source);
    if line == 0 || line > doc.line_count() {
        return Err(format!("{}: no line {}", name, line));
    }
    doc.goto_line(line);
    let navigator = DefinitionNavigator::new(SigilLexer::markdown());
    let destination = if backward {
        backward_definition(&mut doc, &navigator, count)
    } else {
        forward_definition(&mut doc, &navigator, count)
    };
    log::debug!("{}: {:?} at offset {}", name, destination, doc.cursor());
    Ok(match destination {
        Destination::Line(line) => format!("{}\n", line),
        Destination::DocumentStart => "start\n".to_string(),
        Destination::DocumentEnd => "end\n".to_string(),
    })
}

/// Token dump in one of [TOKEN_FORMATS].
pub fn tokens(source: &str, format: &str) -> Result<String, String> {
    let tokens = tokenize(source);
    match format {
        "json" => serde_json::to_string_pretty(&tokens)
            .map(|json| json + "\n")
            .map_err(|e| format!("JSON serialization failed: {}", e)),
        "simple" => Ok(tokens
            .iter()
            .map(|token| format!("{}\n", token))
            .collect::<String>()),
        other => Err(format!(
            "Unknown token format '{}' (available: {})",
            other,
            TOKEN_FORMATS.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "* outer\n  item, \n  item2\nend\n";

    #[test]
    fn test_indent() {
        let config = IndentConfig::default();
        assert_eq!(indent("a.md", SCENARIO, 3, &config).unwrap(), "2\n");
        assert_eq!(indent("a.md", "say \"x\ny", 2, &config).unwrap(), "none\n");
        assert!(indent("a.md", SCENARIO, 9, &config).is_err());
        assert_eq!(
            indent("a.md", "x\nend\ny", 3, &config).unwrap_err(),
            "a.md:2: Unmatched end"
        );
    }

    #[test]
    fn test_reindent() {
        let config = IndentConfig {
            indent_tabs_mode: false,
            ..IndentConfig::default()
        };
        let (text, changed) = reindent("a.md", "* a\nb\n    c\n", &config).unwrap();
        assert_eq!(text, "* a\n  b\n  c\n");
        assert_eq!(changed, 2);
    }

    #[test]
    fn test_definition() {
        let source = "intro\n* one\ntext\n## two\n";
        assert_eq!(definition("a.md", source, 1, 2, false).unwrap(), "4\n");
        assert_eq!(definition("a.md", source, 4, 1, true).unwrap(), "2\n");
        assert_eq!(definition("a.md", source, 4, 3, false).unwrap(), "end\n");
    }

    #[test]
    fn test_tokens() {
        let simple = tokens("* a", "simple").unwrap();
        assert_eq!(
            simple,
            "1:0 Keyword(BlockSigil) \"*\"\n1:1 Space \" \"\n1:2 Text \"a\"\n"
        );
        assert!(tokens("* a", "json").unwrap().contains("\"BlockSigil\""));
        assert!(tokens("* a", "xml").is_err());
    }
}
