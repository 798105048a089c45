//! Row tuple

use serde::Deserialize;
use serde::Serialize;

use super::CellValue;
use super::ColumnSpec;

/// An ordered tuple of cells, one row of a grid.
///
/// Serialized as a plain JSON array, which is what the paging protocol's
/// `data` field carries.
///
/// # Example
///
/// ```
/// use rostergrid_lib::model::RowRecord;
///
/// let row: RowRecord = ["1001", "Álvarez", "CCT-01"].into_iter().collect();
/// assert_eq!(row.len(), 3);
/// assert_eq!(row.get(1).and_then(|c| c.as_text()), Some("Álvarez"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRecord(Vec<CellValue>);

impl RowRecord {
    /// Creates a row from its cells.
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self(cells)
    }

    /// Returns the cell at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.0.get(index)
    }

    /// Returns the cell a column reads.
    pub fn cell(&self, column: &ColumnSpec) -> Option<&CellValue> {
        self.0.get(column.source_index)
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[CellValue] {
        &self.0
    }

    /// Consumes the row and returns its cells.
    pub fn into_cells(self) -> Vec<CellValue> {
        self.0
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every column's source index addresses a cell.
    pub fn fits(&self, columns: &[ColumnSpec]) -> bool {
        columns.iter().all(|c| c.source_index < self.0.len())
    }
}

impl From<Vec<CellValue>> for RowRecord {
    fn from(cells: Vec<CellValue>) -> Self {
        Self(cells)
    }
}

impl<T: Into<CellValue>> FromIterator<T> for RowRecord {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
