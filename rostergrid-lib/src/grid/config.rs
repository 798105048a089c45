//! Grid configuration.

use std::sync::Arc;

use super::Language;
use super::RowDecorator;
use crate::model::ColumnSpec;
use crate::model::RowRecord;
use crate::protocol::SortOrder;
use crate::protocol::DEFAULT_PAGE_LENGTH;
use crate::remote::PageSource;
use crate::search::ComparatorRegistry;
use crate::search::HTML_ACCENT_NEUTRAL;

/// Where a grid's rows come from.
#[derive(Clone)]
pub enum DataSource {
    /// Rows already on the page; filtered, sorted and paged client-side.
    Local(Vec<RowRecord>),
    /// A paging source that filters, sorts and pages for the grid.
    Remote(Arc<dyn PageSource>),
}

impl DataSource {
    /// Wraps a page source.
    pub fn remote(source: impl PageSource + 'static) -> Self {
        DataSource::Remote(Arc::new(source))
    }

    /// Returns `true` for remote sources.
    pub fn is_remote(&self) -> bool {
        matches!(self, DataSource::Remote(_))
    }
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Local(rows) => f.debug_tuple("Local").field(&rows.len()).finish(),
            DataSource::Remote(_) => f.debug_tuple("Remote").finish_non_exhaustive(),
        }
    }
}

/// Everything a grid needs besides its mount point.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rostergrid_lib::grid::{DataSource, FlagDecorator, GridConfig};
/// use rostergrid_lib::model::ColumnSpec;
/// use rostergrid_lib::search::ComparatorRegistry;
///
/// let registry = Arc::new(ComparatorRegistry::accent_neutral());
/// let config = GridConfig::new(
///     vec![ColumnSpec::new(0), ColumnSpec::new(1), ColumnSpec::new(2).hidden()],
///     DataSource::Local(Vec::new()),
///     registry,
/// )
/// .with_decorator(FlagDecorator::new(2))
/// .with_page_length(Some(25));
/// ```
#[derive(Clone)]
pub struct GridConfig {
    pub columns: Vec<ColumnSpec>,
    pub data_source: DataSource,
    pub registry: Arc<ComparatorRegistry>,
    /// Comparator kind applied to every column.
    ///
    /// Default: `html-accent-neutral`
    pub comparator: String,
    pub decorators: Vec<Arc<dyn RowDecorator>>,
    pub language: Language,
    /// Rows per page, `None` for all.
    ///
    /// Default: 10
    pub page_length: Option<usize>,
    /// Ordering before the user sorts anything.
    ///
    /// Default: column 0 ascending
    pub initial_order: Option<SortOrder>,
}

impl GridConfig {
    /// Creates a config with the default comparator, paging and ordering.
    pub fn new(
        columns: Vec<ColumnSpec>,
        data_source: DataSource,
        registry: Arc<ComparatorRegistry>,
    ) -> Self {
        Self {
            columns,
            data_source,
            registry,
            comparator: HTML_ACCENT_NEUTRAL.to_string(),
            decorators: Vec::new(),
            language: Language::default(),
            page_length: Some(DEFAULT_PAGE_LENGTH),
            initial_order: Some(SortOrder::asc(0)),
        }
    }

    /// Sets the comparator kind.
    pub fn with_comparator(mut self, kind: impl Into<String>) -> Self {
        self.comparator = kind.into();
        self
    }

    /// Adds a row decorator.
    pub fn with_decorator(mut self, decorator: impl RowDecorator + 'static) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    /// Sets the localized strings.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Sets the page size.
    pub fn with_page_length(mut self, length: Option<usize>) -> Self {
        self.page_length = length;
        self
    }

    /// Sets or clears the initial ordering.
    pub fn with_initial_order(mut self, order: Option<SortOrder>) -> Self {
        self.initial_order = order;
        self
    }
}

impl std::fmt::Debug for GridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridConfig")
            .field("columns", &self.columns)
            .field("data_source", &self.data_source)
            .field("comparator", &self.comparator)
            .field("decorators", &self.decorators.len())
            .field("page_length", &self.page_length)
            .field("initial_order", &self.initial_order)
            .finish_non_exhaustive()
    }
}
