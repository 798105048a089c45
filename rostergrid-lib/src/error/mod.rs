//! Error types

mod config;
mod fetch;
mod query;

pub use config::*;
pub use fetch::*;
pub use query::*;
