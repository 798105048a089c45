//! Server side of the paging protocol.
//!
//! [`TableService`] turns a query string into a page; [`PagingServer`]
//! exposes it over HTTP.

mod http;
mod service;

pub use http::*;
pub use service::*;
