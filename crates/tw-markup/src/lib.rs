//! The markup reader (spec §4.3): parses lightly-marked text into a text
//! specification, grouping footnotes as insertions spliced back in after
//! line breaking.

mod reader;
mod stream;

pub use stream::{FontMode, MainStream, MarkupConfig, TextStream};

#[cfg(test)]
mod tests {
    use super::*;
    use tw_record::Align;

    fn config() -> MarkupConfig {
        MarkupConfig {
            normal_width: 475,
            footnote_width: 475,
            normal_size: 12,
            footnote_size: 10,
            normal_align: Align::Left,
            footnote_align: Align::Left,
            normal_line_spacing: 1,
            footnote_line_spacing: 1,
            normal_paragraph_spacing: 12,
            footnote_paragraph_spacing: 10,
            collaborator: "tw-nonexistent-line-break".into(),
        }
    }

    #[test]
    fn header_then_paragraph_buffers_expected_commands() {
        let mut main = MainStream::new(config());
        main.read_line("# Title");
        main.read_line("");
        main.read_line("Hello *bold* world");
        // Without a real collaborator we only check the text-spec buffer,
        // not the finished content stream (that requires the out-of-scope
        // line_break binary).
        let text = &main.stream_for_test().text_for_test();
        assert!(text.contains("FONT Regular 31"));
        assert!(text.contains("STRING \"Title\""));
        assert!(text.contains("BREAK"));
        assert!(text.contains("FONT Regular 12"));
        assert!(text.contains("FONT Bold 12"));
        assert!(text.contains("STRING \"bold\""));
    }

    #[test]
    fn footnote_symbol_is_emitted_as_a_plain_word() {
        let mut main = MainStream::new(config());
        main.read_line("^1 see note");
        let text = &main.stream_for_test().text_for_test();
        // spec §8: the main stream gets the symbol "1" as a word, no
        // bracket-wrapping (this overrides `original_source`'s behaviour).
        assert!(text.contains("STRING \"1\""));
        assert!(!text.contains("[1]"));
    }

    #[test]
    fn footnote_without_remainder_is_skipped() {
        let mut main = MainStream::new(config());
        main.read_line("^1");
        let text = &main.stream_for_test().text_for_test();
        assert!(text.is_empty());
    }
}
