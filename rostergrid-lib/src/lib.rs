//! Accent-insensitive record grids over a server-paginated protocol.
//!
//! Grids are filtered, sorted and paged either in memory or by a remote
//! endpoint speaking the paging protocol. Searches ignore diacritics and
//! case on both sides, export links carry the live filter, and flagged
//! rows are marked as they render.

pub mod error;
pub mod export;
pub mod grid;
pub mod input;
pub mod model;
pub mod protocol;
pub mod remote;
pub mod search;
pub mod server;
pub mod table;
