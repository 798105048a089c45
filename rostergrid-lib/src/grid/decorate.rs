//! Rendered rows and the hooks that style them.

use std::collections::BTreeSet;

use crate::model::ColumnSpec;
use crate::model::RowRecord;

/// Class applied to rows whose flag is set.
pub const FLAGGED_CLASS: &str = "text-danger";

/// One row as displayed: the visible cells and the row's classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedRow {
    /// Position of the row within the current page.
    pub index: usize,
    /// Display text of the visible columns, in column order.
    pub cells: Vec<String>,
    classes: BTreeSet<String>,
}

impl RenderedRow {
    /// Renders the visible columns of `record`.
    pub fn render(index: usize, record: &RowRecord, columns: &[ColumnSpec]) -> Self {
        let cells = columns
            .iter()
            .filter(|c| c.visible)
            .map(|c| record.cell(c).map(|v| v.display().into_owned()).unwrap_or_default())
            .collect();
        Self {
            index,
            cells,
            classes: BTreeSet::new(),
        }
    }

    /// Returns `true` if the row carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Adds `class`; adding it twice changes nothing.
    pub fn add_class(&mut self, class: &str) {
        if !self.classes.contains(class) {
            self.classes.insert(class.to_string());
        }
    }

    /// Removes `class` if present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// Returns the classes, sorted.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// The value of a `class` attribute for this row.
    pub fn class_attr(&self) -> String {
        self.classes().collect::<Vec<_>>().join(" ")
    }
}

/// Post-render hook run on every row of every page.
///
/// Must be idempotent: running it twice with the same record leaves the
/// row as running it once.
pub trait RowDecorator: Send + Sync {
    fn decorate(&self, row: &mut RenderedRow, record: &RowRecord);
}

/// Marks rows whose flag cell is truthy.
///
/// # Example
///
/// ```
/// use rostergrid_lib::grid::{FlagDecorator, RenderedRow, RowDecorator};
/// use rostergrid_lib::model::{CellValue, ColumnSpec, RowRecord};
///
/// let columns = [ColumnSpec::new(0), ColumnSpec::new(1).hidden()];
/// let record = RowRecord::new(vec![CellValue::from("M01"), CellValue::from(true)]);
/// let mut row = RenderedRow::render(0, &record, &columns);
///
/// FlagDecorator::new(1).decorate(&mut row, &record);
/// assert!(row.has_class("text-danger"));
/// assert_eq!(row.cells, vec!["M01"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDecorator {
    field: usize,
    class: String,
}

impl FlagDecorator {
    /// Flags on the cell at `field` with the default class.
    pub fn new(field: usize) -> Self {
        Self {
            field,
            class: FLAGGED_CLASS.to_string(),
        }
    }

    /// Uses `class` instead of the default.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Returns the source index of the flag cell.
    pub fn field(&self) -> usize {
        self.field
    }
}

impl RowDecorator for FlagDecorator {
    fn decorate(&self, row: &mut RenderedRow, record: &RowRecord) {
        let flagged = record.get(self.field).is_some_and(|cell| cell.is_truthy());
        if flagged {
            row.add_class(&self.class);
        } else {
            row.remove_class(&self.class);
        }
    }
}
