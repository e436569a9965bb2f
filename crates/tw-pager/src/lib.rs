//! The gizmo flow engine (spec §3, §4.4): groups a content stream into
//! pages and decides page breaks, independently of how the content or the
//! final render are produced.

pub mod contents;
pub mod gizmo;
pub mod page;
pub mod pager;

pub use contents::write_contents;
pub use gizmo::{flow_height, Gizmo};
pub use page::{Geometry, Page, PageGenerator};
pub use pager::Pager;
