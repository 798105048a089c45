//! Row and column models

mod cell;
mod column;
mod row;

pub use cell::*;
pub use column::*;
pub use row::*;
