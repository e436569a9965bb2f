//! Pages, page geometry, and the page-number/header graphics (spec §3
//! "Page", §4.4 "Page emission").
//!
//! Grounded on `original_source/pager.py`'s `Page`/`PageGenerator` classes.
//! The atomic "commit" rule (`try_add_content`) and the page-number graphic
//! post-processing (stripping `box`/`opt_break` framing off a one-line
//! line-break run) are ported nearly verbatim; headers are new per spec
//! §4.4/§6 (`-H`), laid out the same way page numbers are.

use tw_record::{line_break, strip_string, Align, StrResult};

use crate::gizmo::{flow_height, Gizmo};

/// Fixed page geometry (spec §6: A4 at 1pt/unit, default margins).
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub top_padding: u32,
    pub bot_padding: u32,
    pub left_padding: u32,
    pub right_padding: u32,
}

impl Geometry {
    /// Content height budget: `height − top_padding − bot_padding`.
    ///
    /// Per spec §9's documented known limitation, header and page-number
    /// graphics are emitted *inside* the margins without being subtracted
    /// from this budget — a box that reaches all the way to the top margin
    /// can visually overlap a configured header. This is preserved
    /// behaviour, not a bug to fix here.
    pub fn max_content_height(&self) -> u32 {
        self.height.saturating_sub(self.top_padding).saturating_sub(self.bot_padding)
    }

    pub fn content_width(&self) -> u32 {
        self.width.saturating_sub(self.left_padding).saturating_sub(self.right_padding)
    }
}

/// Monotonically-numbering page factory (spec §3 "Page" lifecycle).
pub struct PageGenerator {
    geometry: Geometry,
    count: u32,
}

impl PageGenerator {
    pub fn new(geometry: Geometry) -> Self {
        PageGenerator { geometry, count: 0 }
    }

    pub fn new_page(&mut self) -> Page {
        self.count += 1;
        Page::new(self.geometry, self.count.to_string())
    }
}

/// A single page under construction (spec §3 "Page").
pub struct Page {
    geometry: Geometry,
    page_number: String,
    normal: Vec<Gizmo>,
    footnote: Vec<Gizmo>,
    marks: Vec<String>,
    empty: bool,
}

impl Page {
    fn new(geometry: Geometry, page_number: String) -> Self {
        Page {
            geometry,
            page_number,
            normal: Vec::new(),
            footnote: Vec::new(),
            marks: Vec::new(),
            empty: true,
        }
    }

    pub fn page_number(&self) -> &str {
        &self.page_number
    }

    /// Whether any content has been committed to this page yet (spec §3
    /// "Page" lifecycle).
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn mark(&mut self, label: String) {
        self.marks.push(label);
    }

    pub fn marks(&self) -> &[String] {
        &self.marks
    }

    fn add_content(&mut self, normal_batch: &[Gizmo], footnote_batch: &[Gizmo]) {
        if !normal_batch.is_empty() || !footnote_batch.is_empty() {
            self.empty = false;
        }
        self.normal.extend_from_slice(normal_batch);
        self.footnote.extend_from_slice(footnote_batch);
    }

    /// Atomic fit-or-overflow commit (spec §4.4 "Commit").
    ///
    /// Succeeds when both batches fit within the content height budget
    /// together with what's already on the page, or when the page is empty
    /// (a page must make forward progress even on oversized content, spec
    /// §8 "Page budget"). On failure the page is left unmutated.
    pub fn try_add_content(&mut self, normal_batch: &[Gizmo], footnote_batch: &[Gizmo]) -> bool {
        let normal_height = flow_height(self.normal.iter().chain(normal_batch));
        let footnote_height = flow_height(self.footnote.iter().chain(footnote_batch));
        let total = normal_height + footnote_height;

        if total > self.geometry.max_content_height() && !self.empty {
            return false;
        }
        self.add_content(normal_batch, footnote_batch);
        true
    }

    /// Write this page's contents-file records: one `"<mark>" "<page>"`
    /// record per mark (spec §4.5).
    pub fn write_marks(&self, out: &mut impl std::fmt::Write) -> std::fmt::Result {
        for mark in &self.marks {
            writeln!(out, "\"{}\" \"{}\"", strip_string(mark), strip_string(&self.page_number))?;
        }
        Ok(())
    }

    /// Emit this page's pages-stream record (spec §4.4 "Page emission").
    pub fn write(
        &self,
        out: &mut impl std::fmt::Write,
        collaborator: &str,
        show_page_number: bool,
        header: Option<&str>,
    ) -> StrResult<()> {
        writeln!(out, "START PAGE").map_err(fmt_err)?;

        let x = self.geometry.left_padding;
        let mut y = self.geometry.height - self.geometry.top_padding;
        for gizmo in skip_leading_discardables(&self.normal) {
            y -= gizmo.height();
            if let Gizmo::Box { payload, .. } = gizmo {
                writeln!(out, "MOVE {x} {y}").map_err(fmt_err)?;
                out.write_str(payload).map_err(fmt_err)?;
            }
        }

        let mut y = self.geometry.bot_padding + flow_height(&self.footnote);
        for gizmo in skip_leading_discardables(&self.footnote) {
            y -= gizmo.height();
            if let Gizmo::Box { payload, .. } = gizmo {
                writeln!(out, "MOVE {x} {y}").map_err(fmt_err)?;
                out.write_str(payload).map_err(fmt_err)?;
            }
        }

        if show_page_number {
            let graphic = self.page_number_graphic(collaborator)?;
            writeln!(out, "MOVE {x} {}", self.geometry.bot_padding / 2).map_err(fmt_err)?;
            out.write_str(&graphic).map_err(fmt_err)?;
        }

        if let Some(text) = header {
            let graphic = self.header_graphic(collaborator, text)?;
            writeln!(out, "MOVE {x} {}", self.geometry.height - self.geometry.top_padding / 2)
                .map_err(fmt_err)?;
            out.write_str(&graphic).map_err(fmt_err)?;
        }

        writeln!(out, "END").map_err(fmt_err)
    }

    fn page_number_graphic(&self, collaborator: &str) -> StrResult<String> {
        inline_graphic(collaborator, &self.page_number, self.geometry.content_width())
    }

    fn header_graphic(&self, collaborator: &str, text: &str) -> StrResult<String> {
        inline_graphic(collaborator, text, self.geometry.content_width())
    }
}

/// Run a one-line text specification through the line breaker with centred
/// alignment and strip the `box`/`opt_break` framing lines from its output,
/// leaving just the inner graphic literal (spec §4.4).
fn inline_graphic(collaborator: &str, text: &str, width: u32) -> StrResult<String> {
    let spec = format!("FONT Regular 12\nSTRING \"{}\"\n", strip_string(text));
    let content = line_break(collaborator, &spec, width, Align::Centre)?;
    Ok(strip_framing(&content))
}

/// Skip a flow's leading run of discardable gizmos so the walk in
/// [`Page::write`] doesn't spend vertical space on glue that collapses
/// against the page boundary (spec §4.4, §8's "glue before first box"
/// scenario). A trailing run needs no such skip: nothing after it is drawn,
/// so walking over it (and discarding the resulting `y`) is harmless.
fn skip_leading_discardables(gizmos: &[Gizmo]) -> &[Gizmo] {
    let start = gizmos.iter().position(|g| !g.is_discardable()).unwrap_or(gizmos.len());
    &gizmos[start..]
}

fn strip_framing(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        let first = line.split_whitespace().next();
        if matches!(first, Some("box") | Some("opt_break")) {
            continue;
        }
        out.push_str(line);
    }
    out
}

fn fmt_err(e: std::fmt::Error) -> ecow::EcoString {
    ecow::eco_format!("{e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry { width: 595, height: 842, top_padding: 125, bot_padding: 125, left_padding: 102, right_padding: 102 }
    }

    fn boxed(h: u32) -> Gizmo {
        Gizmo::Box { height: h, payload: format!("START TEXT\nSTUFF {h}\nEND\n") }
    }

    fn glue(h: u32) -> Gizmo {
        Gizmo::Glue { height: h }
    }

    #[test]
    fn page_numbers_are_monotone() {
        let mut gen = PageGenerator::new(geometry());
        let p1 = gen.new_page();
        let p2 = gen.new_page();
        let p3 = gen.new_page();
        assert_eq!(p1.page_number(), "1");
        assert_eq!(p2.page_number(), "2");
        assert_eq!(p3.page_number(), "3");
    }

    #[test]
    fn single_box_commits_to_an_empty_page() {
        let mut page = PageGenerator::new(geometry()).new_page();
        assert!(page.try_add_content(&[boxed(10)], &[]));
        assert_eq!(page.normal.len(), 1);
    }

    #[test]
    fn oversized_batch_still_commits_to_an_empty_page() {
        // budget = 842 - 125 - 125 = 592
        let mut page = PageGenerator::new(geometry()).new_page();
        assert!(page.try_add_content(&[boxed(1000)], &[]));
    }

    #[test]
    fn batch_that_overflows_a_nonempty_page_is_rejected_without_mutation() {
        let mut page = PageGenerator::new(geometry()).new_page();
        assert!(page.try_add_content(&[boxed(500)], &[]));
        assert!(!page.try_add_content(&[boxed(500)], &[]));
        assert_eq!(page.normal.len(), 1);
    }

    #[test]
    fn leading_glue_is_discarded_from_the_fit_decision() {
        let mut page = PageGenerator::new(geometry()).new_page();
        assert!(page.try_add_content(&[glue(100), boxed(10)], &[]));
        // only the box counts: budget is nowhere near exhausted.
        assert!(page.try_add_content(&[boxed(580)], &[]));
    }

    #[test]
    fn page_emission_places_first_box_at_height_minus_top_minus_box() {
        let mut page = PageGenerator::new(geometry()).new_page();
        page.try_add_content(&[boxed(10)], &[]);
        let mut out = String::new();
        // No collaborator call is needed: no page number/header configured.
        page.write(&mut out, "tw-nonexistent-line-break", false, None).unwrap();
        assert!(out.contains("MOVE 102 717")); // 842 - 125 - 10
        assert!(out.contains("STUFF 10"));
    }

    #[test]
    fn leading_glue_does_not_shift_the_first_box() {
        let mut page = PageGenerator::new(geometry()).new_page();
        page.try_add_content(&[glue(100), boxed(10)], &[]);
        let mut out = String::new();
        page.write(&mut out, "tw-nonexistent-line-break", false, None).unwrap();
        assert!(out.contains("MOVE 102 717")); // 842 - 125 - 10, glue collapses
    }

    #[test]
    fn committing_empty_batches_does_not_flip_emptiness() {
        let mut page = PageGenerator::new(geometry()).new_page();
        assert!(page.try_add_content(&[], &[]));
        assert!(page.is_empty());
    }

    #[test]
    fn marks_round_trip_through_write_marks() {
        let mut page = PageGenerator::new(geometry()).new_page();
        page.mark("Chapter One".to_string());
        let mut out = String::new();
        page.write_marks(&mut out).unwrap();
        assert_eq!(out, "\"Chapter One\" \"1\"\n");
    }
}
