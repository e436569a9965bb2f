//! Shared plumbing for the `markup-text` and `pager` binaries.

pub mod terminal;
