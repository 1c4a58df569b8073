//! lazyjson CLI
//!
//! Examples:
//!   lazyjson data.json                    - dump the whole tree
//!   lazyjson data.json --path cost/unit   - dump one subtree
//!   cat data.json | lazyjson --raw        - check and print trimmed text

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use lazyjson_tree::{Document, ParseError, ParseOptions};
use tracing::debug;

mod print;

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;
const EXIT_IO_ERROR: i32 = 3;

/// Validate a JSON document and dump it as an indented tree.
#[derive(Parser, Debug)]
#[command(name = "lazyjson", version)]
struct Args {
    /// Input file (or "-" for stdin)
    input: Option<PathBuf>,

    /// Dump only the node at this path (e.g. `server/hosts[0]`)
    #[arg(long, value_name = "EXPR")]
    path: Option<String>,

    /// Print the trimmed document text instead of the tree
    #[arg(long)]
    raw: bool,

    /// Maximum container nesting depth (1 to 4096)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=4096))]
    max_depth: Option<u32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            match &e {
                CliError::Parse {
                    error,
                    source,
                    filename,
                } => error.write_report(filename, source, io::stderr()),
                _ => eprintln!("error: {e}"),
            }
            std::process::exit(e.exit_code());
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let input = read_input(args.input.as_deref())?;
    let filename = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => path.display().to_string(),
        _ => "<stdin>".to_string(),
    };
    debug!(filename, len = input.len(), "Read input");

    let mut options = ParseOptions::default();
    if let Some(depth) = args.max_depth {
        options = options.max_depth(depth as usize);
    }

    let doc = Document::parse_with_options(&input, options).map_err(|error| CliError::Parse {
        error,
        source: String::from_utf8_lossy(&input).into_owned(),
        filename: filename.clone(),
    })?;

    let node = match &args.path {
        Some(path) => doc
            .traverse(path)
            .ok_or_else(|| CliError::NotFound(path.clone()))?,
        None => doc.root(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.raw {
        writeln!(out, "{}", node.raw_text())?;
    } else {
        print::write_tree(&mut out, &node)?;
    }
    out.flush()?;
    Ok(())
}

fn read_input(file: Option<&std::path::Path>) -> Result<Vec<u8>, io::Error> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read(path),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Parse {
        error: ParseError,
        source: String,
        filename: String,
    },
    NotFound(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Parse { .. } => EXIT_SYNTAX_ERROR,
            CliError::NotFound(_) => EXIT_NOT_FOUND,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Parse { error, .. } => write!(f, "{error}"),
            CliError::NotFound(path) => write!(f, "no node at path `{path}`"),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["lazyjson", "in.json", "--path", "a[0]", "--max-depth", "8"])
            .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("in.json")));
        assert_eq!(args.path.as_deref(), Some("a[0]"));
        assert_eq!(args.max_depth, Some(8));
        assert!(!args.raw);
    }

    #[test]
    fn test_max_depth_is_bounded() {
        let parse = |depth: &str| Args::try_parse_from(["lazyjson", "--max-depth", depth]);
        assert_eq!(parse("4096").unwrap().max_depth, Some(4096));
        assert!(parse("4097").is_err());
        assert!(parse("1000000000").is_err());
        assert!(parse("0").is_err());
    }

    #[test]
    fn test_exit_codes() {
        let err = Document::parse("[").unwrap_err();
        let parse = CliError::Parse {
            error: err,
            source: "[".into(),
            filename: "<stdin>".into(),
        };
        assert_eq!(parse.exit_code(), EXIT_SYNTAX_ERROR);
        assert_eq!(CliError::NotFound("x".into()).exit_code(), EXIT_NOT_FOUND);
        assert_eq!(
            CliError::Io(io::Error::other("gone")).exit_code(),
            EXIT_IO_ERROR
        );
    }
}
