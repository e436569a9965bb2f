//! The markup reader binary (spec §6 "Markup reader").
//!
//! Grounded on `typst-cli/src/args.rs`'s `#[derive(Parser)]` style and
//! `typst-cli/src/main.rs`'s `main`/`dispatch`/`print_error` split, cut down
//! to a single binary with no subcommands.

use std::io::{self, BufReader, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use tw_markup::{MainStream, MarkupConfig};
use tw_record::Align;

/// Reads line-oriented markup and produces a text specification for the
/// line-break collaborator (spec §4.3).
#[derive(Debug, Parser)]
#[command(name = "markup-text", author, version)]
struct CliArguments {
    /// Normal text width, in points.
    #[arg(short = 'w')]
    width: u32,

    /// Footnote width, in points (default: same as -w).
    #[arg(short = 'W')]
    footnote_width: Option<u32>,

    /// Normal font size.
    #[arg(short = 's', default_value_t = 12)]
    size: i64,

    /// Footnote font size.
    #[arg(short = 'S', default_value_t = 12)]
    footnote_size: i64,

    /// Normal text alignment.
    #[arg(short = 'a', value_enum, default_value = "l")]
    align: Align,

    /// Footnote text alignment (default: same as -a).
    #[arg(short = 'A', value_enum)]
    footnote_align: Option<Align>,

    /// Normal line spacing.
    #[arg(short = 'l', default_value_t = 1)]
    line_spacing: i64,

    /// Footnote line spacing.
    #[arg(short = 'L', default_value_t = 1)]
    footnote_line_spacing: i64,

    /// Normal paragraph spacing (default: same as -s).
    #[arg(short = 'p')]
    paragraph_spacing: Option<i64>,

    /// Footnote paragraph spacing (default: same as -S).
    #[arg(short = 'P')]
    footnote_paragraph_spacing: Option<i64>,

    /// Name (or path) of the line-break collaborator binary.
    #[arg(long, default_value = "line_break")]
    collaborator: String,
}

fn main() -> ExitCode {
    let args = match CliArguments::try_parse() {
        Ok(args) => args,
        Err(e) => return tw_cli::terminal::exit_on_parse_error(e),
    };

    let config = MarkupConfig {
        normal_width: args.width,
        footnote_width: args.footnote_width.unwrap_or(args.width),
        normal_size: args.size,
        footnote_size: args.footnote_size,
        normal_align: args.align,
        footnote_align: args.footnote_align.unwrap_or(args.align),
        normal_line_spacing: args.line_spacing,
        footnote_line_spacing: args.footnote_line_spacing,
        normal_paragraph_spacing: args.paragraph_spacing.unwrap_or(args.size),
        footnote_paragraph_spacing: args.footnote_paragraph_spacing.unwrap_or(args.footnote_size),
        collaborator: args.collaborator.into(),
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            let _ = tw_cli::terminal::print_error(&msg);
            ExitCode::FAILURE
        }
    }
}

fn run(config: MarkupConfig) -> Result<(), String> {
    let collaborator = config.collaborator.to_string();

    let mut input = String::new();
    io::stdin().read_to_string(&mut input).map_err(|e| format!("failed to read input: {e}"))?;

    let mut stream = MainStream::new(config);
    stream
        .read_all(BufReader::new(input.as_bytes()))
        .map_err(|e| format!("failed to read markup: {e}"))?;

    let content = stream.finish(&collaborator).map_err(|e| e.to_string())?;

    io::stdout().write_all(content.as_bytes()).map_err(|e| format!("failed to write output: {e}"))?;
    Ok(())
}
