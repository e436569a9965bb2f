//! The pager binary (spec §6 "Pager").
//!
//! Grounded on `typst-cli/src/args.rs`'s derive style and
//! `typst-cli/src/main.rs`'s `main`/`dispatch`/`print_error` split.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;

use clap::Parser;

use tw_pager::{write_contents, Geometry, Pager};

/// Fixed page geometry (spec §6: A4 at 1pt/unit).
const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;

/// Groups a content stream into pages and emits the pages stream (spec
/// §4.4).
#[derive(Debug, Parser)]
#[command(name = "pager", author, version)]
struct CliArguments {
    /// Left margin, in points.
    #[arg(short = 'l', default_value_t = 102)]
    left: u32,

    /// Right margin, in points.
    #[arg(short = 'r', default_value_t = 102)]
    right: u32,

    /// Top margin, in points.
    #[arg(short = 't', default_value_t = 125)]
    top: u32,

    /// Bottom margin, in points.
    #[arg(short = 'b', default_value_t = 125)]
    bottom: u32,

    /// Optional path to write the contents record file to.
    #[arg(short = 'c')]
    contents: Option<std::path::PathBuf>,

    /// Enable page numbers.
    #[arg(short = 'n')]
    page_numbers: bool,

    /// Optional running header text.
    #[arg(short = 'H')]
    header: Option<String>,

    /// Name (or path) of the line-break collaborator binary, used to lay
    /// out page-number and header graphics.
    #[arg(long, default_value = "line_break")]
    collaborator: String,
}

fn main() -> ExitCode {
    let args = match CliArguments::try_parse() {
        Ok(args) => args,
        Err(e) => return tw_cli::terminal::exit_on_parse_error(e),
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            let _ = tw_cli::terminal::print_error(&msg);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArguments) -> Result<(), String> {
    let geometry = Geometry {
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        top_padding: args.top,
        bot_padding: args.bottom,
        left_padding: args.left,
        right_padding: args.right,
    };

    let mut input = BufReader::new(io::stdin());
    let pages = Pager::new(geometry).run(&mut input).map_err(|e| e.to_string())?;

    let mut out = String::new();
    for page in &pages {
        page.write(&mut out, &args.collaborator, args.page_numbers, args.header.as_deref())
            .map_err(|e| e.to_string())?;
    }
    io::stdout().write_all(out.as_bytes()).map_err(|e| format!("failed to write output: {e}"))?;

    if let Some(path) = &args.contents {
        let mut contents = String::new();
        write_contents(&pages, &mut contents).map_err(|e| format!("failed to format contents: {e}"))?;
        let mut file = File::create(path).map_err(|e| format!("failed to create {}: {e}", path.display()))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    }

    Ok(())
}
