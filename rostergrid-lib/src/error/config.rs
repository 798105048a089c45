//! Grid configuration errors

/// Errors raised when a grid configuration cannot be honoured.
///
/// A missing mount point is not an error; see
/// [`GridBinding::mount`](crate::grid::GridBinding::mount).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration names a comparator kind the registry does not know.
    #[error("Unknown comparator kind: {0}")]
    UnknownComparator(String),

    /// A grid needs at least one column.
    #[error("Grid '{table_id}' has no columns")]
    NoColumns { table_id: String },

    /// A local row is too short for a column's source index.
    #[error("Row {row} has {len} cells but column {column} reads source index {source_index}")]
    RowTooShort {
        row: usize,
        len: usize,
        column: usize,
        source_index: usize,
    },

    /// A remote grid's endpoint could not be resolved.
    #[error("Invalid endpoint for grid '{table_id}': {message}")]
    InvalidEndpoint { table_id: String, message: String },
}
