//! Command-line interface for markdent
//! This binary computes indentation and navigates definitions in markup files.
//!
//! Usage:
//!   markdent indent `<path>` --line `<n>`                         - Print the column line n should have
//!   markdent reindent `<path>` [--write]                         - Reindent every line
//!   markdent definition `<path>` --line `<n>` [--count `<c>`] [--backward] - Jump between definitions
//!   markdent tokens `<path>` [--format json|simple]              - Dump the token stream
//!
//! Global flags `--config`, `--indent-width`, `--tab-width`, `--spaces` and `-v` apply to every
//! subcommand.

mod handlers;
mod logger;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use markdent_config::{LoadError, Loader, MarkdentConfig};
use std::fs;
use std::process;

/// User configuration picked up from the working directory when present.
const LOCAL_CONFIG: &str = "markdent.toml";

fn cli() -> Command {
    let path = || {
        Arg::new("path")
            .help("Path to the markup file")
            .required(true)
            .index(1)
    };
    let line = || {
        Arg::new("line")
            .long("line")
            .short('l')
            .help("1-based line number")
            .required(true)
            .value_parser(value_parser!(usize))
    };

    Command::new("markdent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Token-driven indentation and definition navigation for markup files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .global(true),
        )
        .arg(
            Arg::new("indent-width")
                .long("indent-width")
                .help("Columns per nesting level")
                .value_parser(value_parser!(u16))
                .global(true),
        )
        .arg(
            Arg::new("tab-width")
                .long("tab-width")
                .help("Columns a tab counts for")
                .value_parser(value_parser!(u16))
                .global(true),
        )
        .arg(
            Arg::new("spaces")
                .long("spaces")
                .help("Indent with spaces only")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (repeatable)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("indent")
                .about("Print the indentation column of a line")
                .arg(path())
                .arg(line()),
        )
        .subcommand(
            Command::new("reindent")
                .about("Reindent every line and print the result")
                .arg(path())
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .help("Rewrite the file in place instead of printing")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("definition")
                .about("Print the line reached by jumping between definitions")
                .arg(path())
                .arg(line())
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('n')
                        .help("Number of definitions to jump")
                        .value_parser(value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("backward")
                        .long("backward")
                        .short('b')
                        .help("Jump to previous definitions")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Dump the token stream")
                .arg(path())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(handlers::TOKEN_FORMATS.to_vec())
                        .default_value("json"),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });
    let verbosity = matches.get_count("verbose");
    logger::init(logger::level_filter(config.logging.level.raised(verbosity)));

    let result = match matches.subcommand() {
        Some((name, sub)) => run(name, sub, &config),
        None => Err("no subcommand given".to_string()),
    };
    match result {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Defaults, then `markdent.toml` if present, then `--config`, then individual flags.
fn load_config(matches: &ArgMatches) -> Result<MarkdentConfig, LoadError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(width) = matches.get_one::<u16>("indent-width") {
        loader = loader.set_override("indentation.indent_width", i64::from(*width))?;
    }
    if let Some(width) = matches.get_one::<u16>("tab-width") {
        loader = loader.set_override("indentation.tab_width", i64::from(*width))?;
    }
    if matches.get_flag("spaces") {
        loader = loader.set_override("indentation.indent_tabs_mode", false)?;
    }
    loader.build()
}

fn run(name: &str, sub: &ArgMatches, config: &MarkdentConfig) -> Result<String, String> {
    let path = sub
        .get_one::<String>("path")
        .ok_or_else(|| "missing path".to_string())?;
    let source =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    let line = || {
        sub.get_one::<usize>("line")
            .copied()
            .ok_or_else(|| "missing --line".to_string())
    };

    match name {
        "indent" => handlers::indent(path, &source, line()?, &config.indentation),
        "reindent" => {
            let (text, _) = handlers::reindent(path, &source, &config.indentation)?;
            if sub.get_flag("write") {
                fs::write(path, text).map_err(|e| format!("cannot write {}: {}", path, e))?;
                Ok(String::new())
            } else {
                Ok(text)
            }
        }
        "definition" => {
            let count = sub.get_one::<usize>("count").copied().unwrap_or(1);
            handlers::definition(path, &source, line()?, count, sub.get_flag("backward"))
        }
        "tokens" => {
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("json");
            handlers::tokens(&source, format)
        }
        other => Err(format!("unknown subcommand '{}'", other)),
    }
}
