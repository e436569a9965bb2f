//! Contents-file emission (spec §4.5).
//!
//! Grounded on `original_source/pager.py`'s `Page.write_marks` and the
//! record shape consumed by `original_source/contents.py`
//! (`"<mark>" "<page>"`, two quoted fields). The `contents` page generator
//! itself is out of scope; this crate only produces the records it reads.

use crate::page::Page;

/// Write one `"<mark>" "<page>"` record per mark, in page emission order,
/// across all finished pages (spec §4.5).
pub fn write_contents(pages: &[Page], out: &mut impl std::fmt::Write) -> std::fmt::Result {
    for page in pages {
        page.write_marks(out)?;
    }
    Ok(())
}
