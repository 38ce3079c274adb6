//! docai CLI - Parse, validate and normalize tagged documents
//!
//! Usage:
//!   docai [OPTIONS] <COMMAND> <FILE>
//!
//! Commands:
//!   parse      Parse markup and print canonical JSON
//!   validate   Report parse diagnostics
//!   stats      Show document statistics
//!   normalize  Re-emit document JSON in canonical form
//!
//! `-` reads from stdin.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use docai_core::{Block, Node, ParseResult, Parser, ParserOptions, DEFAULT_MAX_DEPTH};
use serde::Serialize;
use tracing::debug;

#[derive(ClapParser)]
#[command(name = "docai")]
#[command(about = "Parse, validate and normalize tagged documents")]
#[command(version)]
struct Cli {
    /// Containers nested deeper than this are flattened into text
    #[arg(long, global = true, env = "DOCAI_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "DOCAI_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse markup and print the document as JSON
    Parse {
        /// Input file, or `-` for stdin
        file: PathBuf,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Check a document for diagnostics; exits 1 if any are found
    Validate {
        file: PathBuf,
        /// Report diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show document statistics
    Stats {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Read document JSON and print it in canonical form
    Normalize {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Run one command. `Ok(false)` means the command completed but the input
/// did not pass (validation found diagnostics).
fn run(cli: Cli) -> Result<bool> {
    let mut parser = Parser::new().with_options(ParserOptions {
        max_depth: cli.max_depth,
    });

    match cli.command {
        Commands::Parse { file, pretty } => cmd_parse(&mut parser, &file, pretty),
        Commands::Validate { file, json } => cmd_validate(&mut parser, &file, json),
        Commands::Stats { file, json } => cmd_stats(&mut parser, &file, json),
        Commands::Normalize { file, pretty } => cmd_normalize(&file, pretty),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn parse_input(parser: &mut Parser, path: &Path) -> Result<ParseResult> {
    let bytes = read_input(path)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(docai_core::Error::from)
        .with_context(|| format!("cannot parse '{}'", path.display()))?;
    let result = parser.parse_with_recovery(text);
    debug!(file = %path.display(), diagnostics = result.errors.len(), "parsed input");
    Ok(result)
}

fn print_block(block: &Block, pretty: bool) -> Result<()> {
    let json = if pretty {
        docai_core::to_json_pretty(block)?
    } else {
        docai_core::to_json(block)?
    };
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(parser: &mut Parser, path: &Path, pretty: bool) -> Result<bool> {
    let result = parse_input(parser, path)?;

    for error in result.errors.iter() {
        eprintln!("warning: {}", error);
    }

    print_block(&result.document, pretty)?;
    Ok(true)
}

// =============================================================================
// Validate Command
// =============================================================================

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    kind: String,
    message: &'a str,
    span: Option<JsonSpan>,
    recoverable: bool,
}

#[derive(Serialize)]
struct JsonSpan {
    start: u32,
    end: u32,
}

fn cmd_validate(parser: &mut Parser, path: &Path, json: bool) -> Result<bool> {
    let result = parse_input(parser, path)?;
    let valid = result.errors.is_empty();

    if json {
        let errors: Vec<_> = result
            .errors
            .iter()
            .map(|e| JsonDiagnostic {
                kind: format!("{:?}", e.kind),
                message: &e.message,
                span: e.span.map(|s| JsonSpan {
                    start: s.start,
                    end: s.end,
                }),
                recoverable: e.recoverable,
            })
            .collect();
        println!(
            "{}",
            serde_json::json!({ "valid": valid, "errors": errors })
        );
    } else if valid {
        println!("Valid: no diagnostics");
    } else {
        eprintln!("Invalid: {} diagnostic(s) found", result.errors.len());
        for error in result.errors.iter() {
            eprintln!("  - {}", error);
        }
    }

    Ok(valid)
}

// =============================================================================
// Stats Command
// =============================================================================

#[derive(Debug, Default, Serialize)]
struct DocumentStats {
    blocks: usize,
    lists: usize,
    items: usize,
    dicts: usize,
    entries: usize,
    text_lines: usize,
    max_depth: usize,
    diagnostics: usize,
}

impl DocumentStats {
    fn from_result(result: &ParseResult) -> Self {
        let mut stats = Self {
            diagnostics: result.errors.len(),
            ..Self::default()
        };
        stats.count_block(&result.document, 0);
        stats
    }

    fn count_block(&mut self, block: &Block, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        for node in &block.body {
            match node {
                Node::Text(_) => self.text_lines += 1,
                Node::Block(child) => {
                    self.blocks += 1;
                    self.count_block(child, depth + 1);
                }
                Node::List(list) => {
                    self.lists += 1;
                    for item in &list.items {
                        self.items += 1;
                        self.count_block(item, depth + 1);
                    }
                }
                Node::Dict(dict) => {
                    self.dicts += 1;
                    self.entries += dict.len();
                }
            }
        }
    }
}

fn cmd_stats(parser: &mut Parser, path: &Path, json: bool) -> Result<bool> {
    let result = parse_input(parser, path)?;
    let stats = DocumentStats::from_result(&result);

    if json {
        println!("{}", serde_json::to_string(&stats)?);
        return Ok(true);
    }

    println!("Document Statistics");
    println!("-------------------");
    println!("Head:         {}", result.document.head.as_deref().unwrap_or("-"));
    println!();
    println!("Content:");
    println!("  Blocks:       {}", stats.blocks);
    println!("  Lists:        {}", stats.lists);
    println!("  List items:   {}", stats.items);
    println!("  Dicts:        {}", stats.dicts);
    println!("  Dict entries: {}", stats.entries);
    println!("  Text lines:   {}", stats.text_lines);
    println!("  Max depth:    {}", stats.max_depth);
    println!();
    println!("Diagnostics:  {}", stats.diagnostics);

    Ok(true)
}

// =============================================================================
// Normalize Command
// =============================================================================

fn cmd_normalize(path: &Path, pretty: bool) -> Result<bool> {
    let bytes = read_input(path)?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("'{}' is not valid UTF-8", path.display()))?;
    let block = docai_core::from_json(&text)
        .with_context(|| format!("'{}' is not a valid document", path.display()))?;
    print_block(&block, pretty)?;
    Ok(true)
}
