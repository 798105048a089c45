//! Paged data sources.
//!
//! [`PageSource`] is the seam between a grid and wherever its rows live.
//! [`RemotePageSource`] speaks the paging protocol over HTTP;
//! [`MemoryTable`](crate::table::MemoryTable) answers from rows in memory.

mod config;
mod source;

pub use config::*;
pub use source::*;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::protocol::PageRequest;
use crate::protocol::PageResponse;

/// Something that can answer page requests.
///
/// Implementations do not retry and do not filter stale answers; the grid
/// compares the echoed `draw` token itself.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page described by `request`.
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse, FetchError>;
}
