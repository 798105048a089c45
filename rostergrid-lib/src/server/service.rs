//! Paging endpoint logic, independent of transport.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::error::ConfigError;
use crate::error::FetchError;
use crate::error::QueryError;
use crate::model::ColumnSpec;
use crate::model::RowRecord;
use crate::protocol::PageRequest;
use crate::protocol::PageResponse;
use crate::remote::PageSource;
use crate::search::ComparatorRegistry;
use crate::search::HTML_ACCENT_NEUTRAL;
use crate::table::MemoryTable;

/// Answers paging queries from an in-memory table.
///
/// The table's own column layout decides which columns are searched and
/// sorted; column descriptors sent by the client are ignored. Searches use
/// the same accent and case folding as client-side grids.
#[derive(Debug, Clone)]
pub struct TableService {
    table: Arc<MemoryTable>,
}

impl TableService {
    pub fn new(table: MemoryTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Builds a table with the default `html-accent-neutral` comparator.
    pub fn from_rows(columns: Vec<ColumnSpec>, rows: Vec<RowRecord>) -> Result<Self, ConfigError> {
        let registry = ComparatorRegistry::accent_neutral();
        let transform = registry
            .get(HTML_ACCENT_NEUTRAL)
            .ok_or_else(|| ConfigError::UnknownComparator(HTML_ACCENT_NEUTRAL.to_string()))?;
        Ok(Self::new(MemoryTable::new(columns, rows, transform)?))
    }

    pub fn table(&self) -> &MemoryTable {
        &self.table
    }

    /// Parses a raw query string and answers it.
    pub fn handle_query(&self, query: &str) -> Result<PageResponse, QueryError> {
        let request = PageRequest::from_query_str(query)?;
        self.answer(&request)
    }

    /// Answers a parsed request.
    pub fn answer(&self, request: &PageRequest) -> Result<PageResponse, QueryError> {
        let columns = self.table.columns().len();
        if let Some(order) = request.order {
            if order.column >= columns {
                return Err(QueryError::ColumnOutOfRange {
                    column: order.column,
                    columns,
                });
            }
        }
        let response = self.table.query(request);
        debug!(
            "draw={} search='{}' -> {} of {} rows",
            request.draw,
            request.search,
            response.len(),
            response.records_filtered
        );
        Ok(response)
    }
}

#[async_trait]
impl PageSource for TableService {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        self.answer(request).map_err(|e| FetchError::Server(e.to_string()))
    }
}
