//! JSON table files served by `rostergrid serve`.

use std::fs;
use std::path::Path;

use rostergrid_lib::error::ConfigError;
use rostergrid_lib::model::sequential_columns;
use rostergrid_lib::model::ColumnSpec;
use rostergrid_lib::model::RowRecord;
use rostergrid_lib::server::TableService;
use serde::Deserialize;

use crate::CliError;

/// Rows plus an optional column layout.
///
/// ```json
/// {
///   "rows": [["M01", "José Álvarez", false], ["M02", "María Beltrán", true]],
///   "flag_column": 2
/// }
/// ```
///
/// Without `columns`, every cell of the first row gets a plain column and
/// the flag column, if any, is hidden.
#[derive(Debug, Clone, Deserialize)]
pub struct TableFile {
    #[serde(default)]
    pub columns: Option<Vec<ColumnSpec>>,
    pub rows: Vec<RowRecord>,
    #[serde(default)]
    pub flag_column: Option<usize>,
}

impl TableFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Column layout to serve with.
    pub fn layout(&self) -> Vec<ColumnSpec> {
        if let Some(columns) = &self.columns {
            return columns.clone();
        }
        let width = self.rows.first().map_or(0, RowRecord::len);
        let mut columns = sequential_columns(width);
        if let Some(flag) = self.flag_column.and_then(|i| columns.get_mut(i)) {
            *flag = flag.hidden();
        }
        columns
    }

    pub fn into_service(self) -> Result<TableService, ConfigError> {
        let columns = self.layout();
        TableService::from_rows(columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_hides_flag_column() {
        let file: TableFile = serde_json::from_str(
            r#"{"rows": [["M01", "José", false]], "flag_column": 2}"#,
        )
        .unwrap();
        let columns = file.layout();
        assert_eq!(columns.len(), 3);
        assert!(columns[1].visible);
        assert!(!columns[2].visible);
    }

    #[test]
    fn test_explicit_columns_win() {
        let file: TableFile = serde_json::from_str(
            r#"{"columns": [{"source_index": 1}], "rows": [["a", "b"]]}"#,
        )
        .unwrap();
        assert_eq!(file.layout(), vec![ColumnSpec::new(1)]);
        assert!(file.into_service().is_ok());
    }
}
