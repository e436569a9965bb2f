//! The pager's parsing loop and state machine (spec §4.4 "Parsing loop",
//! "State machine").
//!
//! Grounded on `original_source/pager.py`'s main loop: `flow`/`mark`/
//! `box`/`glue`/`opt_break` dispatch over records, with `new_page` added
//! per spec §4.4 (the distillation's addition over the original script,
//! which only had `opt_break`).

use std::collections::HashMap;
use std::io::BufRead;

use ecow::EcoString;
use tw_record::graphic::read_graphic;
use tw_record::record::parse_record;
use tw_record::{warn, StrResult};

use crate::gizmo::Gizmo;
use crate::page::{Geometry, Page, PageGenerator};

const FLOWS: [&str; 2] = ["normal", "footnote"];

/// Per-flow gizmos accumulated since the last `opt_break`/`new_page`, not
/// yet committed to a page (spec §4.4 "collecting pending" state).
struct Pending {
    batches: HashMap<&'static str, Vec<Gizmo>>,
}

impl Pending {
    fn new() -> Self {
        let batches = FLOWS.iter().map(|&flow| (flow, Vec::new())).collect();
        Pending { batches }
    }

    fn push(&mut self, flow: &str, gizmo: Gizmo) {
        if let Some(batch) = self.batches.get_mut(flow) {
            batch.push(gizmo);
        }
    }

    fn take(&mut self) -> (Vec<Gizmo>, Vec<Gizmo>) {
        let normal = self.batches.get_mut("normal").map(std::mem::take).unwrap_or_default();
        let footnote = self.batches.get_mut("footnote").map(std::mem::take).unwrap_or_default();
        (normal, footnote)
    }
}

/// Drives the pager over a content stream, producing finished [`Page`]s in
/// emission order.
pub struct Pager {
    generator: PageGenerator,
    active: Option<Page>,
    pending: Pending,
    current_flow: String,
    pages: Vec<Page>,
}

impl Pager {
    pub fn new(geometry: Geometry) -> Self {
        let mut generator = PageGenerator::new(geometry);
        let active = Some(generator.new_page());
        Pager { generator, active, pending: Pending::new(), current_flow: "normal".to_string(), pages: Vec::new() }
    }

    fn active(&mut self) -> &mut Page {
        self.active.as_mut().expect("a page is always open between close_page calls")
    }

    /// Run the full parsing loop over `input`, returning the finished pages
    /// in emission order (spec §4.4). Fails fatally only on a malformed
    /// graphic literal (spec §7); everything else is a warning.
    pub fn run(mut self, input: &mut impl BufRead) -> StrResult<Vec<Page>> {
        loop {
            let fields = parse_record(input).map_err(|e| ecow::eco_format!("{e}"))?;
            let Some(fields) = fields else { break };
            if fields.is_empty() {
                continue;
            }
            match fields[0].as_str() {
                "flow" => self.handle_flow(&fields),
                "mark" => self.handle_mark(&fields),
                "box" => self.handle_box(&fields, input)?,
                "glue" => self.handle_glue(&fields),
                "opt_break" => self.commit_or_break(false),
                "new_page" => self.commit_or_break(true),
                other => warn!("unrecognised command '{other}'"),
            }
        }
        // End-of-input: one final commit, then close the last page.
        self.commit_pending();
        self.close_page();
        Ok(self.pages)
    }

    fn handle_flow(&mut self, fields: &[EcoString]) {
        if fields.len() != 2 {
            warn!("flow command expects one argument.");
            return;
        }
        if !FLOWS.contains(&fields[1].as_str()) {
            warn!("invalid flow '{}'", fields[1]);
            return;
        }
        self.current_flow = fields[1].to_string();
    }

    fn handle_mark(&mut self, fields: &[EcoString]) {
        if fields.len() != 2 {
            warn!("mark command expects one argument.");
            return;
        }
        self.active().mark(fields[1].to_string());
    }

    fn handle_box(&mut self, fields: &[EcoString], input: &mut impl BufRead) -> StrResult<()> {
        if fields.len() != 2 {
            warn!("box command expects one argument.");
            return Ok(());
        }
        let height: u32 = fields[1].parse().unwrap_or_else(|_| {
            warn!("box command argument must be integer.");
            0
        });
        let payload = read_graphic(input)?;
        self.pending.push(&self.current_flow.clone(), Gizmo::Box { height, payload });
        Ok(())
    }

    fn handle_glue(&mut self, fields: &[EcoString]) {
        if fields.len() != 2 {
            warn!("glue command expects one argument.");
            return;
        }
        let height: u32 = fields[1].parse().unwrap_or_else(|_| {
            warn!("glue command argument must be integer.");
            0
        });
        self.pending.push(&self.current_flow.clone(), Gizmo::Glue { height });
    }

    /// `opt_break`/`new_page` both attempt a commit; `new_page` additionally
    /// forces a page break when the current page is non-empty afterward
    /// (spec §4.4).
    fn commit_or_break(&mut self, force: bool) {
        self.commit_pending();
        if force && !self.active().is_empty() {
            self.close_page();
            self.active = Some(self.generator.new_page());
        }
    }

    /// Atomic commit (spec §4.4 "Commit"): try the pending batches against
    /// the active page; on overflow, close it, open a new one, and
    /// force-append the same batches there (a page must make forward
    /// progress even on oversized content).
    fn commit_pending(&mut self) {
        let (normal, footnote) = self.pending.take();
        if !self.active().try_add_content(&normal, &footnote) {
            self.close_page();
            self.active = Some(self.generator.new_page());
            self.active().try_add_content(&normal, &footnote);
        }
    }

    fn close_page(&mut self) {
        let finished = self.active.take().expect("a page is always open between close_page calls");
        self.pages.push(finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn geometry() -> Geometry {
        Geometry { width: 595, height: 842, top_padding: 125, bot_padding: 125, left_padding: 102, right_padding: 102 }
    }

    #[test]
    fn empty_input_yields_no_pages() {
        let mut input = Cursor::new("");
        let pages = Pager::new(geometry()).run(&mut input).unwrap();
        assert_eq!(pages.len(), 0);
    }

    #[test]
    fn single_box_produces_one_page() {
        let mut input = Cursor::new("box 10\nSTART TEXT\nEND\n");
        let pages = Pager::new(geometry()).run(&mut input).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn new_page_forces_a_break_when_non_empty() {
        let mut input = Cursor::new("box 10\nSTART TEXT\nEND\nnew_page\nbox 10\nSTART TEXT\nEND\n");
        let pages = Pager::new(geometry()).run(&mut input).unwrap();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn new_page_on_an_untouched_page_does_not_create_a_blank_one() {
        let mut input = Cursor::new("new_page\nbox 10\nSTART TEXT\nEND\n");
        let pages = Pager::new(geometry()).run(&mut input).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn oversized_box_gets_its_own_page_without_looping_forever() {
        let mut input = Cursor::new("box 1000\nSTART TEXT\nEND\n");
        let pages = Pager::new(geometry()).run(&mut input).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn marks_attach_to_the_page_open_when_the_mark_record_is_parsed() {
        let mut input = Cursor::new(
            "mark \"Intro\"\nbox 10\nSTART TEXT\nEND\nnew_page\nmark \"Second\"\nbox 10\nSTART TEXT\nEND\n",
        );
        let pages = Pager::new(geometry()).run(&mut input).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].marks(), ["Intro"]);
        assert_eq!(pages[1].marks(), ["Second"]);
    }

    #[test]
    fn unknown_commands_are_warnings_not_fatal() {
        let mut input = Cursor::new("bogus\nbox 10\nSTART TEXT\nEND\n");
        let pages = Pager::new(geometry()).run(&mut input).unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn malformed_graphic_is_fatal() {
        let mut input = Cursor::new("box 10\nnot a graphic\n");
        assert!(Pager::new(geometry()).run(&mut input).is_err());
    }
}
