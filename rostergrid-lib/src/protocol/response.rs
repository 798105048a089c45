//! Page response.

use serde::Deserialize;
use serde::Serialize;

use crate::error::FetchError;
use crate::model::ColumnSpec;
use crate::model::RowRecord;

/// One page of rows as returned by a paging endpoint.
///
/// Field names follow the endpoint contract exactly: `draw`,
/// `recordsTotal`, `recordsFiltered`, `data` and the optional `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    /// Token of the request this answers.
    pub draw: u64,
    /// Row count before filtering.
    pub records_total: u64,
    /// Row count after filtering, never above `records_total`.
    pub records_filtered: u64,
    /// The rows of the requested page.
    pub data: Vec<RowRecord>,
    /// Error message reported by the endpoint instead of rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResponse {
    /// Creates a response with rows and counts.
    pub fn new(draw: u64, records_total: u64, records_filtered: u64, data: Vec<RowRecord>) -> Self {
        Self {
            draw,
            records_total,
            records_filtered,
            data,
            error: None,
        }
    }

    /// Creates an error response carrying no rows.
    pub fn failed(draw: u64, message: impl Into<String>) -> Self {
        Self {
            draw,
            records_total: 0,
            records_filtered: 0,
            data: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks the response against the protocol invariants and the column
    /// layout the grid will read it with.
    pub fn validate(&self, columns: &[ColumnSpec]) -> Result<(), FetchError> {
        if let Some(message) = &self.error {
            return Err(FetchError::Server(message.clone()));
        }
        if self.records_filtered > self.records_total {
            return Err(FetchError::parse(format!(
                "recordsFiltered ({}) exceeds recordsTotal ({})",
                self.records_filtered, self.records_total
            )));
        }
        if let Some((i, row)) = self.data.iter().enumerate().find(|(_, row)| !row.fits(columns)) {
            return Err(FetchError::parse(format!(
                "row {} has {} cells, fewer than the column layout needs",
                i,
                row.len()
            )));
        }
        Ok(())
    }
}
