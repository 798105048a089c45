//! Column specification

use serde::Deserialize;
use serde::Serialize;

/// How one grid column reads and treats its cells.
///
/// Every flag defaults to `true`. Hidden columns are still searched, sorted
/// and visible to row decorators; they are only left out of the rendered
/// cells.
///
/// # Examples
///
/// ```
/// use rostergrid_lib::model::ColumnSpec;
///
/// let columns = vec![
///     ColumnSpec::new(0),           // ID
///     ColumnSpec::new(1),           // Name
///     ColumnSpec::action(6),        // Actions
///     ColumnSpec::new(7).hidden(),  // misplaced flag
/// ];
/// assert!(!columns[2].orderable);
/// assert!(!columns[3].visible);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Position of this column's value in each row tuple.
    pub source_index: usize,
    /// Whether the column takes part in sorting.
    #[serde(default = "yes")]
    pub orderable: bool,
    /// Whether the column takes part in filtering.
    #[serde(default = "yes")]
    pub searchable: bool,
    /// Whether the column is rendered.
    #[serde(default = "yes")]
    pub visible: bool,
}

fn yes() -> bool {
    true
}

impl ColumnSpec {
    /// Creates a visible, orderable, searchable column reading `source_index`.
    pub fn new(source_index: usize) -> Self {
        Self {
            source_index,
            orderable: true,
            searchable: true,
            visible: true,
        }
    }

    /// Creates a column for pre-rendered action buttons: neither orderable
    /// nor searchable.
    pub fn action(source_index: usize) -> Self {
        Self::new(source_index).not_orderable().not_searchable()
    }

    /// Excludes the column from sorting.
    pub fn not_orderable(mut self) -> Self {
        self.orderable = false;
        self
    }

    /// Excludes the column from filtering.
    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    /// Keeps the column out of the rendered cells.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Builds the usual `0..count` column layout.
pub fn sequential_columns(count: usize) -> Vec<ColumnSpec> {
    (0..count).map(ColumnSpec::new).collect()
}
