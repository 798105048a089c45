//! Page-level wiring: which grids a page gets and how its events reach them.

use std::sync::Arc;

use log::debug;
use log::warn;
use url::Url;

use super::DataSource;
use super::Document;
use super::Element;
use super::FlagDecorator;
use super::GridBinding;
use super::GridConfig;
use super::GridRegistry;
use super::Language;
use super::AJAX_URL_ATTR;
use super::DATATABLE_CLASS;
use crate::error::ConfigError;
use crate::error::FetchError;
use crate::export::ExportAction;
use crate::export::Navigation;
use crate::grid::Commit;
use crate::input::FilterInput;
use crate::input::UppercaseInputCoercer;
use crate::model::sequential_columns;
use crate::model::ColumnSpec;
use crate::protocol::Direction;
use crate::remote::RemoteConfig;
use crate::remote::RemotePageSource;
use crate::search::ComparatorRegistry;

/// A server-paginated table the page may contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTable {
    pub table_id: String,
    pub columns: Vec<ColumnSpec>,
    /// Source index of the boolean cell that marks a row.
    pub flag_column: Option<usize>,
}

impl RemoteTable {
    pub fn new(table_id: impl Into<String>, columns: Vec<ColumnSpec>) -> Self {
        Self {
            table_id: table_id.into(),
            columns,
            flag_column: None,
        }
    }

    /// Marks rows whose cell at `source_index` is truthy.
    pub fn with_flag(mut self, source_index: usize) -> Self {
        self.flag_column = Some(source_index);
        self
    }
}

/// What [`GridPage::init`] looks for on a page.
#[derive(Debug, Clone)]
pub struct PageSetup {
    /// Origin that relative `data-ajax-url` values resolve against.
    pub origin: Url,
    pub remote_tables: Vec<RemoteTable>,
    pub exports: Vec<ExportAction>,
    pub remote: RemoteConfig,
    pub registry: Arc<ComparatorRegistry>,
    pub language: Language,
}

impl PageSetup {
    /// An empty setup; only `datatable-search` tables will initialize.
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            remote_tables: Vec::new(),
            exports: Vec::new(),
            remote: RemoteConfig::default(),
            registry: Arc::new(ComparatorRegistry::accent_neutral()),
            language: Language::default(),
        }
    }

    /// The staff roster (`tablaMaestros`) and FUP pages.
    ///
    /// `tablaMaestros` has six data columns, an action column and a hidden
    /// misplacement flag; `tablaFUPs` has seven data columns and two action
    /// columns. Each has an Excel export button.
    pub fn school_records(origin: Url) -> Self {
        let mut maestros: Vec<ColumnSpec> = (0..6).map(ColumnSpec::new).collect();
        maestros.push(ColumnSpec::action(6));
        maestros.push(ColumnSpec::new(7).hidden());

        let mut fups: Vec<ColumnSpec> = (0..7).map(ColumnSpec::new).collect();
        fups.push(ColumnSpec::action(7));
        fups.push(ColumnSpec::action(8));

        Self::new(origin)
            .with_remote_table(RemoteTable::new("tablaMaestros", maestros).with_flag(7))
            .with_remote_table(RemoteTable::new("tablaFUPs", fups))
            .with_export(ExportAction::new(
                "export-excel-btn",
                "tablaMaestros",
                "/maestros/exportar/excel/",
            ))
            .with_export(ExportAction::new(
                "export-excel-fup-btn",
                "tablaFUPs",
                "/fup/exportar/excel/",
            ))
    }

    pub fn with_remote_table(mut self, table: RemoteTable) -> Self {
        self.remote_tables.push(table);
        self
    }

    pub fn with_export(mut self, action: ExportAction) -> Self {
        self.exports.push(action);
        self
    }

    pub fn with_remote_config(mut self, config: RemoteConfig) -> Self {
        self.remote = config;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    fn is_remote_table(&self, element: &Element) -> bool {
        element
            .id
            .as_deref()
            .is_some_and(|id| self.remote_tables.iter().any(|t| t.table_id == id))
    }
}

/// The grids and buttons of one loaded page.
///
/// Event handlers are plain method calls. On a key release in a filter
/// box the coercer rewrites the box first, and the grid then reads the
/// rewritten value.
#[derive(Debug, Default)]
pub struct GridPage {
    grids: GridRegistry,
    exports: Vec<ExportAction>,
    coercer: UppercaseInputCoercer,
}

impl GridPage {
    /// Initializes every grid `setup` finds on `document`.
    ///
    /// Absent mount points are skipped. A grid that fails to initialize is
    /// logged and left out; the rest of the page still works. Remote grids
    /// are mounted but not fetched; call [`load`](Self::load).
    pub fn init(document: &Document, setup: &PageSetup) -> Self {
        let mut grids = GridRegistry::new();

        for table in &setup.remote_tables {
            match mount_remote(document, setup, table) {
                Ok(Some(grid)) => {
                    grids.insert(grid);
                }
                Ok(None) => {}
                Err(err) => warn!("grid '{}' not initialized: {}", table.table_id, err),
            }
        }

        let local = document
            .by_class(DATATABLE_CLASS)
            .filter(|element| !setup.is_remote_table(element));
        for (n, element) in local.enumerate() {
            let table_id = element
                .id
                .clone()
                .unwrap_or_else(|| format!("{}-{}", DATATABLE_CLASS, n));
            let width = element.rows.iter().map(|row| row.len()).max().unwrap_or(0);
            if width == 0 {
                debug!("table '{}' has no rows, skipping", table_id);
                continue;
            }
            let config = GridConfig::new(
                sequential_columns(width),
                DataSource::Local(element.rows.clone()),
                setup.registry.clone(),
            )
            .with_language(setup.language.clone());
            match GridBinding::attach(&table_id, config) {
                Ok(grid) => {
                    grids.insert(grid);
                }
                Err(err) => warn!("grid '{}' not initialized: {}", table_id, err),
            }
        }

        Self {
            grids,
            exports: setup.exports.clone(),
            coercer: UppercaseInputCoercer,
        }
    }

    /// Returns the mounted grids.
    pub fn grids(&self) -> &GridRegistry {
        &self.grids
    }

    /// Returns the grid mounted on `table_id`.
    pub fn grid(&self, table_id: &str) -> Option<&GridBinding> {
        self.grids.get(table_id)
    }

    /// Fetches the first page of every remote grid.
    ///
    /// Failures are recorded on the failing grid and logged.
    pub async fn load(&self) {
        for grid in self.grids.iter().filter(|g| g.is_remote()) {
            if let Err(err) = grid.refresh().await {
                warn!("initial load of '{}' failed: {}", grid.table_id(), err);
            }
        }
    }

    /// Handles a key release in the filter box of `table_id`.
    ///
    /// Uppercases the box, hands its value to the grid and, for remote
    /// grids, fetches the new first page. Returns `Ok(None)` when there is
    /// no such grid or the term did not change.
    pub async fn on_filter_key_up(
        &self,
        table_id: &str,
        input: &mut FilterInput,
    ) -> Result<Option<Commit>, FetchError> {
        self.coercer.on_key_up(input);

        let Some(grid) = self.grids.get(table_id) else {
            return Ok(None);
        };
        let changed = grid.set_search(input.value());
        settle(grid, changed).await
    }

    /// Handles a click on the header of `column` in `table_id`.
    ///
    /// A first click sorts ascending; clicking the sorted column again
    /// reverses it. Non-orderable columns do nothing.
    pub async fn on_header_click(
        &self,
        table_id: &str,
        column: usize,
    ) -> Result<Option<Commit>, FetchError> {
        let Some(grid) = self.grids.get(table_id) else {
            return Ok(None);
        };
        let direction = match grid.order() {
            Some(order) if order.column == column => order.direction.reversed(),
            _ => Direction::Asc,
        };
        let changed = grid.order_by(column, direction);
        settle(grid, changed).await
    }

    /// Handles a click on the pager of `table_id`; `page` is zero-based.
    pub async fn on_page(
        &self,
        table_id: &str,
        page: usize,
    ) -> Result<Option<Commit>, FetchError> {
        let Some(grid) = self.grids.get(table_id) else {
            return Ok(None);
        };
        let changed = grid.set_page(page);
        settle(grid, changed).await
    }

    /// Handles a click on `element_id`; only export buttons react.
    pub fn on_click(&self, element_id: &str) -> Option<Navigation> {
        self.exports
            .iter()
            .find(|action| action.button_id == element_id)?
            .on_click(&self.grids)
    }
}

/// Local grids have already re-rendered; remote ones fetch the new page.
async fn settle(grid: &GridBinding, changed: bool) -> Result<Option<Commit>, FetchError> {
    if !changed {
        return Ok(None);
    }
    if grid.is_remote() {
        return grid.refresh().await.map(Some);
    }
    Ok(Some(Commit::Applied))
}

fn mount_remote(
    document: &Document,
    setup: &PageSetup,
    table: &RemoteTable,
) -> Result<Option<GridBinding>, ConfigError> {
    let Some(element) = document.element(&table.table_id) else {
        debug!("no mount point '{}', skipping grid", table.table_id);
        return Ok(None);
    };
    let invalid = |message: String| ConfigError::InvalidEndpoint {
        table_id: table.table_id.clone(),
        message,
    };

    let ajax_url = element
        .data_attr(AJAX_URL_ATTR)
        .ok_or_else(|| invalid(format!("missing data-{}", AJAX_URL_ATTR)))?;
    let endpoint = setup
        .origin
        .join(ajax_url)
        .map_err(|e| invalid(format!("{}: {}", ajax_url, e)))?;
    let source = RemotePageSource::builder()
        .endpoint(endpoint.as_str())
        .config(setup.remote.clone())
        .build()
        .map_err(|e| invalid(e.to_string()))?;

    let mut config = GridConfig::new(
        table.columns.clone(),
        DataSource::remote(source),
        setup.registry.clone(),
    )
    .with_language(setup.language.clone());
    if let Some(flag) = table.flag_column {
        config = config.with_decorator(FlagDecorator::new(flag));
    }
    GridBinding::attach(&table.table_id, config).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowRecord;
    use crate::protocol::SortOrder;

    fn origin() -> Url {
        Url::parse("http://escuela.test/").unwrap()
    }

    fn roster() -> Vec<RowRecord> {
        vec![
            ["Álvarez", "Primaria"].into_iter().collect(),
            ["Beltrán", "Secundaria"].into_iter().collect(),
        ]
    }

    #[test]
    fn test_school_records_layout() {
        let setup = PageSetup::school_records(origin());
        let maestros = &setup.remote_tables[0];
        assert_eq!(maestros.columns.len(), 8);
        assert!(!maestros.columns[6].orderable && !maestros.columns[6].searchable);
        assert!(!maestros.columns[7].visible);
        assert_eq!(maestros.flag_column, Some(7));
        assert_eq!(setup.remote_tables[1].columns.len(), 9);
        assert_eq!(setup.exports.len(), 2);
    }

    #[test]
    fn test_init_mounts_present_grids_only() {
        let document = Document::new()
            .with(Element::new("tablaMaestros").with_data(AJAX_URL_ATTR, "/maestros/ajax/"))
            .with(Element::new("otra").with_class(DATATABLE_CLASS).with_rows(roster()))
            .with(Element::anonymous().with_class(DATATABLE_CLASS));
        let page = GridPage::init(&document, &PageSetup::school_records(origin()));

        assert_eq!(page.grids().ids(), vec!["otra", "tablaMaestros"]);
        assert!(page.grid("tablaMaestros").unwrap().is_remote());
        assert!(!page.grid("otra").unwrap().is_remote());
        assert!(page.grid("tablaFUPs").is_none());
    }

    #[test]
    fn test_remote_table_is_not_initialized_locally() {
        let document = Document::new().with(
            Element::new("tablaMaestros")
                .with_class(DATATABLE_CLASS)
                .with_rows(roster()),
        );
        let page = GridPage::init(&document, &PageSetup::school_records(origin()));
        // No data-ajax-url: the remote grid fails and no local fallback is made.
        assert!(page.grids().is_empty());
    }

    #[tokio::test]
    async fn test_key_up_coerces_then_searches() {
        let document = Document::new().with(
            Element::new("lista")
                .with_class(DATATABLE_CLASS)
                .with_rows(roster()),
        );
        let page = GridPage::init(&document, &PageSetup::new(origin()));
        let mut input = FilterInput::new("belt").with_selection(2, 2);

        let commit = page.on_filter_key_up("lista", &mut input).await.unwrap();
        assert_eq!(commit, Some(Commit::Applied));
        assert_eq!(input.value(), "BELT");
        assert_eq!(input.caret(), Some(2));

        let grid = page.grid("lista").unwrap();
        assert_eq!(grid.search_term(), "BELT");
        assert_eq!(grid.view().rows.len(), 1);
        assert_eq!(grid.view().rows[0].cells[0], "Beltrán");

        let again = page.on_filter_key_up("lista", &mut input).await.unwrap();
        assert_eq!(again, None);
    }

    #[tokio::test]
    async fn test_header_clicks_toggle_direction() {
        let document = Document::new().with(
            Element::new("lista")
                .with_class(DATATABLE_CLASS)
                .with_rows(roster()),
        );
        let page = GridPage::init(&document, &PageSetup::new(origin()));
        let grid = page.grid("lista").unwrap();
        assert_eq!(grid.view().rows[0].cells[0], "Álvarez");

        // Already ascending on column 0, so the first click reverses it.
        assert_eq!(page.on_header_click("lista", 0).await.unwrap(), Some(Commit::Applied));
        assert_eq!(grid.order(), Some(SortOrder::desc(0)));
        assert_eq!(grid.view().rows[0].cells[0], "Beltrán");

        assert_eq!(page.on_header_click("lista", 1).await.unwrap(), Some(Commit::Applied));
        assert_eq!(grid.order(), Some(SortOrder::asc(1)));
        assert_eq!(grid.view().rows[0].cells[1], "Primaria");

        assert_eq!(page.on_header_click("lista", 5).await.unwrap(), None);
        assert_eq!(page.on_header_click("nada", 0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_page_turn_on_local_grid() {
        let rows: Vec<RowRecord> = ["a", "b", "c"].iter().map(|n| [*n].into_iter().collect()).collect();
        let document = Document::new().with(
            Element::new("lista")
                .with_class(DATATABLE_CLASS)
                .with_rows(rows),
        );
        let page = GridPage::init(&document, &PageSetup::new(origin()));
        let grid = page.grid("lista").unwrap();
        grid.set_page_length(Some(2));

        assert_eq!(page.on_page("lista", 1).await.unwrap(), Some(Commit::Applied));
        assert_eq!(grid.start(), 2);
        assert_eq!(grid.view().rows[0].cells[0], "c");
        assert_eq!(page.on_page("lista", 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_export_click_reads_coerced_filter() {
        let document = Document::new()
            .with(Element::new("tablaFUPs").with_data(AJAX_URL_ATTR, "/fup/ajax/"));
        let page = GridPage::init(&document, &PageSetup::school_records(origin()));
        page.grid("tablaFUPs").unwrap().set_search("GARCÍA");

        assert_eq!(
            page.on_click("export-excel-fup-btn"),
            Some(Navigation::To("/fup/exportar/excel/?filtro=GARC%C3%8DA".into()))
        );
        assert_eq!(page.on_click("export-excel-btn"), None);
        assert_eq!(page.on_click("otro-boton"), None);
    }
}
