//! Paging query parse errors

/// Errors raised while parsing a paging query string on the server side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A parameter that must be an integer was not.
    #[error("Parameter '{name}' must be an integer, got '{value}'")]
    NotAnInteger { name: String, value: String },

    /// A parameter was negative where only non-negative values are allowed.
    #[error("Parameter '{name}' must not be negative, got {value}")]
    Negative { name: String, value: i64 },

    /// The sort direction was neither `asc` nor `desc`.
    #[error("Unknown sort direction '{0}'")]
    UnknownDirection(String),

    /// The sort column does not exist in the table.
    #[error("Order column {column} is out of range ({columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
}
