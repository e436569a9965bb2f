//! `TextStream`/`MainStream` (spec §3 "TextStream", §4.3).
//!
//! Grounded on `original_source/markup_text.py`'s `TextStream`/`MainStream`
//! classes: the same word-buffering state machine (`in_paragraph`,
//! `in_string`), the same insertion list for footnote splicing. The
//! splice step is reworked per spec §9 to match whole content-stream lines
//! against `^<id>` rather than doing a raw substring replace, which removes
//! the lexical-collision footgun the original's `str.replace` call has.

use ecow::EcoString;
use tw_record::{line_break, Align, StrResult};

/// A single text specification under construction (spec §3).
///
/// One `TextStream` lays out one logically independent run of text at one
/// width/size/alignment — the main document uses one, and every footnote
/// gets its own (spec §4.3).
pub struct TextStream {
    width: u32,
    align: Align,
    line_spacing: i64,
    paragraph_spacing: i64,
    in_paragraph: bool,
    in_string: bool,
    text: String,
    insertions: Vec<String>,
}

impl TextStream {
    pub fn new(width: u32, align: Align, line_spacing: i64, paragraph_spacing: i64) -> Self {
        TextStream {
            width,
            align,
            line_spacing,
            paragraph_spacing,
            in_paragraph: false,
            in_string: false,
            text: String::new(),
            insertions: Vec::new(),
        }
    }

    /// Append to the currently open `STRING`, opening one first if needed.
    /// A `STRING` may not be interrupted by any other command (spec §3
    /// invariant), so every other method closes it first.
    pub fn add_string(&mut self, s: &str) {
        if !self.in_string {
            self.text.push_str("STRING \"");
            self.in_string = true;
        }
        for c in s.chars() {
            match c {
                '"' => self.text.push_str("\\\""),
                '\n' | '\r' => {}
                _ => self.text.push(c),
            }
        }
    }

    fn close_string(&mut self) {
        if self.in_string {
            self.text.push_str("\"\n");
            self.in_string = false;
        }
    }

    pub fn set_font(&mut self, font_name: &str, size: i64) {
        self.close_string();
        self.text.push_str(&format!("FONT {font_name} {size}\n"));
    }

    /// Emit one word, with an `OPTBREAK` before it if this isn't the first
    /// word of the current paragraph.
    pub fn add_word(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        self.close_string();
        if self.in_paragraph {
            self.text
                .push_str(&format!("OPTBREAK \" \" \"\" {}\n", self.line_spacing));
        }
        self.in_paragraph = true;
        self.add_string(word);
    }

    /// Split `line` on whitespace and add each word.
    pub fn read_words(&mut self, line: &str) {
        for word in line.split_whitespace() {
            self.add_word(word);
        }
    }

    /// End the current paragraph with a `BREAK`, if one is open. After this,
    /// the stream is not "in a paragraph" until the next word (spec §3).
    pub fn end_paragraph(&mut self) {
        if self.in_paragraph {
            self.close_string();
            self.text.push_str(&format!("BREAK {}\n", self.paragraph_spacing));
            self.in_paragraph = false;
        }
    }

    /// Record `insertion` (already-laid-out content-stream bytes) to be
    /// spliced back in at this position once this stream is laid out, and
    /// emit the `MARK` that asks the line breaker to preserve the splice
    /// point.
    pub fn insert_content(&mut self, insertion: String) {
        self.close_string();
        let id = self.insertions.len();
        self.insertions.push(insertion);
        self.text.push_str(&format!("MARK {id}\n"));
    }

    /// Lay this stream out through the line-break collaborator and splice
    /// in any insertions, returning finished content-stream bytes.
    pub fn to_content(mut self, collaborator: &str) -> StrResult<String> {
        self.close_string();
        let content = line_break(collaborator, &self.text, self.width, self.align)?;
        Ok(splice(&content, &self.insertions))
    }
}

/// Replace each `^<id>` line in `content` with its recorded insertion.
///
/// Matches a whole trimmed line against `^<digits>` exactly (not a
/// substring anywhere in the line), so an insertion can never collide with
/// incidental `^`-prefixed text the line breaker happens to emit elsewhere.
fn splice(content: &str, insertions: &[String]) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if let Some(id) = trimmed.strip_prefix('^').and_then(|rest| rest.parse::<usize>().ok()) {
            if let Some(insertion) = insertions.get(id) {
                out.push_str(insertion);
                continue;
            }
        }
        out.push_str(line);
    }
    out
}

/// Current inline emphasis mode while reading a regular line (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontMode {
    Regular,
    Bold,
    Italic,
}

impl FontMode {
    fn name(self) -> &'static str {
        match self {
            FontMode::Regular => "Regular",
            FontMode::Bold => "Bold",
            FontMode::Italic => "Italic",
        }
    }
}

/// Per-stage configuration (spec §6: `-w/-W`, `-s/-S`, `-a/-A`, `-l/-L`,
/// `-p/-P`).
pub struct MarkupConfig {
    pub normal_width: u32,
    pub footnote_width: u32,
    pub normal_size: i64,
    pub footnote_size: i64,
    pub normal_align: Align,
    pub footnote_align: Align,
    pub normal_line_spacing: i64,
    pub footnote_line_spacing: i64,
    pub normal_paragraph_spacing: i64,
    pub footnote_paragraph_spacing: i64,
    /// Name (or path) the line-break collaborator is resolved by.
    pub collaborator: EcoString,
}

/// The main document stream, plus everything `MainStream` adds on top of a
/// plain `TextStream`: header sizing and the footnote/emphasis line reader
/// (spec §4.3). The reading logic lives in `reader.rs`; this module only
/// owns the buffering state.
pub struct MainStream {
    pub(crate) stream: TextStream,
    pub(crate) config: MarkupConfig,
    pub(crate) font_mode: FontMode,
}

impl MainStream {
    pub fn new(config: MarkupConfig) -> Self {
        let mut stream = TextStream::new(
            config.normal_width,
            config.normal_align,
            config.normal_line_spacing,
            config.normal_paragraph_spacing,
        );
        stream.set_font(FontMode::Regular.name(), config.normal_size);
        MainStream { stream, config, font_mode: FontMode::Regular }
    }

    pub fn finish(self, collaborator: &str) -> StrResult<String> {
        self.stream.to_content(collaborator)
    }

    #[cfg(test)]
    pub(crate) fn stream_for_test(&self) -> &TextStream {
        &self.stream
    }
}

#[cfg(test)]
impl TextStream {
    pub(crate) fn text_for_test(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_emit_optbreak_between_but_not_before() {
        let mut s = TextStream::new(100, Align::Left, 1, 12);
        s.add_word("Hello");
        s.add_word("world");
        s.close_string();
        assert_eq!(s.text, "STRING \"Hello\"\nOPTBREAK \" \" \"\" 1\nSTRING \"world\"\n");
    }

    #[test]
    fn end_paragraph_only_when_in_paragraph() {
        let mut s = TextStream::new(100, Align::Left, 1, 12);
        s.end_paragraph();
        assert!(s.text.is_empty());
        s.add_word("Hi");
        s.end_paragraph();
        assert_eq!(s.text, "STRING \"Hi\"\nBREAK 12\n");
        assert!(!s.in_paragraph);
    }

    #[test]
    fn quotes_are_escaped_and_newlines_dropped() {
        let mut s = TextStream::new(100, Align::Left, 1, 12);
        s.add_string("a \"quote\"\nand more");
        s.close_string();
        assert_eq!(s.text, "STRING \"a \\\"quote\\\"and more\"\n");
    }

    #[test]
    fn splice_matches_whole_line_only() {
        let insertions = vec!["flow footnote\n...\nflow normal\n".to_string()];
        let content = "box 5\n^0\nbox 6\n";
        assert_eq!(splice(content, &insertions), "box 5\nflow footnote\n...\nflow normal\nbox 6\n");
    }

    #[test]
    fn splice_does_not_touch_partial_matches() {
        let insertions = vec!["REPLACED\n".to_string()];
        let content = "^0 trailing text makes this not a mark line\n";
        assert_eq!(splice(content, &insertions), content);
    }
}
