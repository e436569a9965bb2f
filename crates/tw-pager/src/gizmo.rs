//! The Gizmo model (spec §3 "Gizmo").
//!
//! Grounded on `original_source/pager.py`'s `Box`/`Glue` classes and
//! `gizmos_height`, reshaped per spec §9's design note into a tagged
//! `enum` instead of the original's duck-typed `is_discardable`/
//! `get_height`/`is_visible`/`print` methods — flow operations become a
//! `match`, no virtual dispatch needed.

/// A unit of vertical content participating in page layout.
///
/// Gizmos are value types: identity is irrelevant, and they are freely
/// copied between a flow's pending and committed buffers (spec §3
/// invariant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gizmo {
    /// A visible unit of given height; the graphic's bytes are carried
    /// verbatim for later re-emission. Never discardable.
    Box { height: u32, payload: String },
    /// Invisible spacing. Discardable: trailing glue does not count toward
    /// a flow's measured height.
    Glue { height: u32 },
}

impl Gizmo {
    pub fn height(&self) -> u32 {
        match self {
            Gizmo::Box { height, .. } => *height,
            Gizmo::Glue { height } => *height,
        }
    }

    pub fn is_discardable(&self) -> bool {
        matches!(self, Gizmo::Glue { .. })
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Gizmo::Box { .. })
    }
}

/// The height a sequence of gizmos contributes to a flow.
///
/// A leading and a trailing run of discardable gizmos (glue) are dropped:
/// spec §4.4 is explicit that "glue collapses against page boundaries on
/// both the top and bottom of each flow", and §8's worked scenario ("glue
/// before first box") confirms a flow's *leading* glue collapses exactly
/// like its trailing glue. Interior glue, between two boxes, always counts.
///
/// Grounded on `pager.py`'s `gizmos_height`, which only drops a trailing
/// run; extended here to drop a leading run too per the spec passage above.
pub fn flow_height<'a>(gizmos: impl IntoIterator<Item = &'a Gizmo>) -> u32 {
    let items: Vec<&Gizmo> = gizmos.into_iter().collect();
    let Some(start) = items.iter().position(|g| !g.is_discardable()) else {
        return 0;
    };
    let end = items.iter().rposition(|g| !g.is_discardable()).expect("start exists");
    items[start..=end].iter().map(|g| g.height()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glue(h: u32) -> Gizmo {
        Gizmo::Glue { height: h }
    }

    fn boxed(h: u32) -> Gizmo {
        Gizmo::Box { height: h, payload: String::new() }
    }

    #[test]
    fn trailing_discardables_do_not_count() {
        let xs = vec![boxed(10), glue(100)];
        assert_eq!(flow_height(&xs), flow_height(&xs[..1]));
    }

    #[test]
    fn leading_glue_is_also_dropped_until_a_box_follows() {
        let xs = vec![glue(100), boxed(10)];
        assert_eq!(flow_height(&xs), 10);
    }

    #[test]
    fn interior_glue_between_boxes_counts() {
        let xs = vec![boxed(10), glue(5), boxed(20)];
        assert_eq!(flow_height(&xs), 35);
    }

    #[test]
    fn empty_flow_has_zero_height() {
        assert_eq!(flow_height(&Vec::<Gizmo>::new()), 0);
    }
}
