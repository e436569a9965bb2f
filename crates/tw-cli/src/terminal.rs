//! Colored diagnostic output (spec §7).
//!
//! Grounded on `typst-cli/src/terminal.rs` and the `print_error` half of
//! `typst-cli/src/main.rs`, trimmed to what a single-binary stage needs: no
//! shared `ARGS` singleton (each binary parses its own argument struct and
//! never needs a second handle to the terminal), no screen-clearing support
//! (neither binary here is a watch-mode loop).

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::error::ErrorKind;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};

/// A handle to standard error, colored when it's a capable terminal.
pub fn out() -> StandardStream {
    let choice = if std::io::stderr().is_terminal() { ColorChoice::Auto } else { ColorChoice::Never };
    StandardStream::stderr(choice)
}

/// Print a fatal application-level error and set the process up to exit 1
/// (spec §6 exit codes, §7 "fatal" policy).
pub fn print_error(msg: &str) -> io::Result<()> {
    let styles = term::Styles::default();
    let mut output = out();
    output.set_color(&styles.header_error)?;
    write!(output, "error")?;
    output.reset()?;
    writeln!(output, ": {msg}")
}

/// Print a non-fatal warning (spec §7 "Malformed record" policy: warn and
/// continue, exit code unaffected).
pub fn print_warning(msg: &str) -> io::Result<()> {
    let styles = term::Styles::default();
    let mut output = out();
    output.set_color(&styles.header_warning)?;
    write!(output, "warning")?;
    output.reset()?;
    writeln!(output, ": {msg}")
}

/// Handle a `clap` argument-parsing failure from `try_parse()`.
///
/// `--help`/`--version` are not failures — clap's own exit (code 0) is
/// correct for those. Everything else (unknown alignment, missing required
/// `-w`, unparsable integer) is one of spec §6/§7's fatal "invalid flag
/// value" cases, which must exit 1 rather than clap's own default exit 2.
pub fn exit_on_parse_error(error: clap::Error) -> ExitCode {
    if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        error.exit();
    }
    let _ = error.print();
    ExitCode::FAILURE
}
