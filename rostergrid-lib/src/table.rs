//! In-memory table answering page requests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::error::FetchError;
use crate::model::ColumnSpec;
use crate::model::RowRecord;
use crate::protocol::Direction;
use crate::protocol::PageRequest;
use crate::protocol::PageResponse;
use crate::remote::PageSource;
use crate::search::matches_query;
use crate::search::query_words;
use crate::search::SearchTransform;

/// Rows held in memory plus the column layout and comparator used to
/// filter, sort and slice them.
///
/// Client-side grids run their searches through this table, and the paging
/// server answers remote grids with it, so both sides apply the same
/// normalization.
#[derive(Clone)]
pub struct MemoryTable {
    columns: Vec<ColumnSpec>,
    rows: Vec<RowRecord>,
    transform: Arc<dyn SearchTransform>,
}

impl MemoryTable {
    /// Creates a table, checking that every row fits the column layout.
    pub fn new(
        columns: Vec<ColumnSpec>,
        rows: Vec<RowRecord>,
        transform: Arc<dyn SearchTransform>,
    ) -> Result<Self, ConfigError> {
        for (row_index, row) in rows.iter().enumerate() {
            if let Some((column, spec)) = columns
                .iter()
                .enumerate()
                .find(|(_, c)| c.source_index >= row.len())
            {
                return Err(ConfigError::RowTooShort {
                    row: row_index,
                    len: row.len(),
                    column,
                    source_index: spec.source_index,
                });
            }
        }
        Ok(Self {
            columns,
            rows,
            transform,
        })
    }

    /// Returns the column layout.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Returns every row, unfiltered.
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows matching `term`, in table order.
    pub fn filtered(&self, term: &str) -> Vec<&RowRecord> {
        let words = query_words(term);
        self.rows
            .iter()
            .filter(|row| matches_query(row, &self.columns, self.transform.as_ref(), &words))
            .collect()
    }

    /// Answers a page request: filter, then sort, then slice.
    ///
    /// An order on an unknown or non-orderable column leaves rows in table
    /// order.
    pub fn query(&self, request: &PageRequest) -> PageResponse {
        let mut rows = self.filtered(&request.search);
        let records_filtered = rows.len() as u64;

        if let Some(order) = request.order {
            if let Some(spec) = self.columns.get(order.column).filter(|c| c.orderable) {
                let transform = self.transform.as_ref();
                rows.sort_by(|a, b| {
                    let (a, b) = match order.direction {
                        Direction::Asc => (a, b),
                        Direction::Desc => (b, a),
                    };
                    match (a.cell(spec), b.cell(spec)) {
                        (Some(x), Some(y)) => transform.compare(x, y),
                        (x, y) => x.is_some().cmp(&y.is_some()),
                    }
                });
            }
        }

        let start = request.start.min(rows.len());
        let end = request.end().map_or(rows.len(), |end| end.min(rows.len()));
        let data = rows[start..end].iter().map(|row| (*row).clone()).collect();

        PageResponse::new(request.draw, self.rows.len() as u64, records_filtered, data)
    }
}

#[async_trait]
impl PageSource for MemoryTable {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        Ok(self.query(request))
    }
}

impl std::fmt::Debug for MemoryTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTable")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}
