//! The server-paging protocol.
//!
//! A grid sends a [`PageRequest`] as GET query parameters and receives a
//! [`PageResponse`] as JSON. The request's `draw` token comes back
//! unchanged so callers can tell which request a response answers.

mod request;
mod response;

pub use request::*;
pub use response::*;
