//! Grids bound to page elements.
//!
//! A [`GridBinding`] owns the live state of one grid: search term, ordering,
//! paging, and the rows on screen. Local grids answer from rows in memory;
//! remote grids ask a [`PageSource`](crate::remote::PageSource) and keep only
//! the answer to their latest request. [`GridPage`] wires a whole page:
//! which grids to mount, and where key and click events go.

mod binding;
mod config;
mod decorate;
mod document;
mod language;
mod page;
mod registry;

pub use binding::*;
pub use config::*;
pub use decorate::*;
pub use document::*;
pub use language::*;
pub use page::*;
pub use registry::*;
