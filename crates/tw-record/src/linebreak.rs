//! The line-break collaborator contract (spec §4.2).
//!
//! The line breaker is invoked as `line_break -<align> -w <width>`; the
//! parent writes the whole text specification to its stdin, closes it, and
//! waits for it to exit, collecting stdout as a byte string.
//!
//! Grounded on `original_source/markup_text.py`'s `line_break` (the
//! `subprocess.Popen` + write + `communicate` shape). Rewritten with a
//! writer thread per spec §9's deadlock note — writing the whole child
//! stdin before reading stdout is fine for inputs that fit comfortably in
//! memory, but a misbehaving line breaker that writes before reading all of
//! its input could otherwise deadlock both sides on a full pipe.

use std::io::{Read, Write};
use std::process::{Command, Stdio};

use crate::bail;
use crate::error::StrResult;

/// Text alignment, shared by every stage that talks to the line breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Align {
    #[value(name = "l")]
    Left,
    #[value(name = "r")]
    Right,
    #[value(name = "c")]
    Centre,
    #[value(name = "j")]
    Justified,
}

impl Align {
    /// The single-character flag the line breaker expects after the dash.
    pub fn flag(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Right => "r",
            Align::Centre => "c",
            Align::Justified => "j",
        }
    }
}

/// Run the line breaker over `text`, returning its stdout as a `String`.
///
/// `program` is the name (or path) the child is resolved by on the system
/// search path, per spec §6.
pub fn line_break(program: &str, text: &str, width: u32, align: Align) -> StrResult<String> {
    let flag = format!("-{}", align.flag());
    let mut child = Command::new(program)
        .arg(flag)
        .arg("-w")
        .arg(width.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ecow::eco_format!("failed to start line-break collaborator: {e}"))?;

    let mut stdin = child.stdin.take().expect("child stdin was requested");
    let input = text.to_owned();
    let writer = std::thread::spawn(move || {
        let _ = stdin.write_all(input.as_bytes());
        // Dropping `stdin` here closes the pipe so the child sees EOF.
    });

    let mut stdout = String::new();
    child
        .stdout
        .take()
        .expect("child stdout was requested")
        .read_to_string(&mut stdout)
        .map_err(|e| ecow::eco_format!("failed to read line-break collaborator output: {e}"))?;

    let _ = writer.join();

    let status = child
        .wait()
        .map_err(|e| ecow::eco_format!("failed to wait on line-break collaborator: {e}"))?;

    if !status.success() {
        let mut stderr = String::new();
        if let Some(mut err) = child.stderr {
            let _ = err.read_to_string(&mut stderr);
        }
        bail!("line-break collaborator exited with {status}: {stderr}");
    }

    Ok(stdout)
}
