//! Graphic literals (spec §3 "Graphic literal").
//!
//! A graphic literal is an arbitrarily-nested `START … END` block; nesting
//! is counted by comparing the first field of each line against `START`/
//! `END`. The whole block's bytes, including the bounding `START`/`END`
//! lines, are preserved verbatim for later re-emission.
//!
//! Grounded on `original_source/pager.py`'s `Graphic` class and
//! `is_start`/`is_end`. Per spec §9's design note, both the bare and
//! `"START"`/`"END"`-quoted spellings count as nesting tokens here — kept as
//! a feature (tolerating re-quoted graphics from an intermediate tool)
//! rather than an artefact to remove; see `DESIGN.md`.

use std::io::BufRead;

use crate::error::StrResult;

/// Read one balanced `START … END` block from `reader`, returning its bytes
/// verbatim. Skips blank lines before the opening `START` the way the
/// surrounding record parser does.
///
/// After a successful read the input cursor sits on the line immediately
/// following the matching `END` (spec §8 property 5).
pub fn read_graphic(reader: &mut impl BufRead) -> StrResult<String> {
    let mut out = String::new();
    let mut depth: u32 = 0;

    let first = next_nonblank_line(reader)
        .ok_or_else(|| ecow::eco_format!("expected START at beginning of graphic"))?;
    if !is_start(&first) {
        crate::bail!("expected START at beginning of graphic");
    }
    out.push_str(&first);
    depth += 1;

    while depth > 0 {
        let line = next_nonblank_line(reader)
            .ok_or_else(|| ecow::eco_format!("graphic was not ended"))?;
        out.push_str(&line);
        if is_start(&line) {
            depth += 1;
        } else if is_end(&line) {
            depth -= 1;
        }
    }

    Ok(out)
}

/// Read the next non-blank line, or `None` at end of input.
fn next_nonblank_line(reader: &mut impl BufRead) -> Option<String> {
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).ok()?;
        if n == 0 {
            return None;
        }
        if !line.trim().is_empty() {
            return Some(line);
        }
    }
}

fn first_field(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

fn is_start(line: &str) -> bool {
    matches!(first_field(line), Some("START") | Some("\"START\""))
}

fn is_end(line: &str) -> bool {
    matches!(first_field(line), Some("END") | Some("\"END\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn flat_graphic() {
        let mut reader = Cursor::new("START TEXT\nMOVE 1 2\nEND\nnext_record\n");
        let g = read_graphic(&mut reader).unwrap();
        assert_eq!(g, "START TEXT\nMOVE 1 2\nEND\n");
        let mut rest = String::new();
        std::io::Read::read_to_string(&mut reader, &mut rest).unwrap();
        assert_eq!(rest, "next_record\n");
    }

    #[test]
    fn nested_graphic() {
        let mut reader = Cursor::new("START A\nSTART B\nEND\nEND\n");
        let g = read_graphic(&mut reader).unwrap();
        assert_eq!(g, "START A\nSTART B\nEND\nEND\n");
    }

    #[test]
    fn quoted_start_end_tokens_count() {
        let mut reader = Cursor::new("\"START\" A\n\"END\"\n");
        let g = read_graphic(&mut reader).unwrap();
        assert_eq!(g, "\"START\" A\n\"END\"\n");
    }

    #[test]
    fn missing_start_is_fatal() {
        let mut reader = Cursor::new("box 10\n");
        assert!(read_graphic(&mut reader).is_err());
    }

    #[test]
    fn unterminated_graphic_is_fatal() {
        let mut reader = Cursor::new("START A\nMOVE 1 2\n");
        assert!(read_graphic(&mut reader).is_err());
    }
}
