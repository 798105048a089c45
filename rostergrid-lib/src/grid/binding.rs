//! A mounted grid and its live state.

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use log::debug;
use log::warn;

use super::DataSource;
use super::Document;
use super::GridConfig;
use super::Language;
use super::RenderedRow;
use super::RowDecorator;
use crate::error::ConfigError;
use crate::error::FetchError;
use crate::model::ColumnSpec;
use crate::protocol::Direction;
use crate::protocol::PageRequest;
use crate::protocol::PageResponse;
use crate::protocol::SortOrder;
use crate::remote::PageSource;
use crate::table::MemoryTable;

/// Where a grid is in its request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Mounted, nothing requested yet.
    #[default]
    Idle,
    /// Waiting for the answer to `draw`.
    Processing { draw: u64 },
    /// Showing the answer to the latest request.
    Ready,
    /// The latest request failed; no rows are shown.
    Failed { draw: u64, message: String },
}

/// What happened to a response handed to [`GridBinding::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The response answered the latest request and is now displayed.
    Applied,
    /// A newer request was issued since; the response was dropped.
    Stale,
}

/// What the grid currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridView {
    /// Token of the request these rows answer.
    pub draw: u64,
    pub records_total: u64,
    pub records_filtered: u64,
    pub rows: Vec<RenderedRow>,
}

#[derive(Debug)]
struct GridState {
    /// Live value of the grid's search box.
    search: String,
    order: Option<SortOrder>,
    start: usize,
    length: Option<usize>,
    /// Token of the most recently issued request.
    latest_draw: u64,
    status: LoadStatus,
    view: GridView,
}

enum Rows {
    Local(MemoryTable),
    Remote(Arc<dyn PageSource>),
}

struct GridInner {
    table_id: String,
    columns: Vec<ColumnSpec>,
    rows: Rows,
    comparator: String,
    decorators: Vec<Arc<dyn RowDecorator>>,
    language: Language,
    state: RwLock<GridState>,
}

/// One grid bound to its mount point.
///
/// Cheap to clone; clones share state, so several refreshes may be in
/// flight at once. Only the answer to the most recently issued request is
/// ever displayed.
///
/// # Example
///
/// ```ignore
/// let grid = GridBinding::mount(&document, "tablaMaestros", config)?
///     .expect("mount point present");
///
/// grid.set_search("garcía");
/// grid.refresh().await?;
/// for row in grid.view().rows {
///     println!("{:?} {}", row.cells, row.class_attr());
/// }
/// ```
#[derive(Clone)]
pub struct GridBinding {
    inner: Arc<GridInner>,
}

impl GridBinding {
    /// Binds a grid to the element `table_id` of `document`.
    ///
    /// Returns `Ok(None)` when the page has no such element. Local grids
    /// render their first page immediately; remote grids wait for
    /// [`refresh`](Self::refresh).
    pub fn mount(
        document: &Document,
        table_id: &str,
        config: GridConfig,
    ) -> Result<Option<Self>, ConfigError> {
        if !document.contains(table_id) {
            debug!("no mount point '{}', skipping grid", table_id);
            return Ok(None);
        }
        Self::attach(table_id, config).map(Some)
    }

    pub(crate) fn attach(table_id: &str, config: GridConfig) -> Result<Self, ConfigError> {
        if config.columns.is_empty() {
            return Err(ConfigError::NoColumns {
                table_id: table_id.to_string(),
            });
        }
        let transform = config
            .registry
            .get(&config.comparator)
            .ok_or_else(|| ConfigError::UnknownComparator(config.comparator.clone()))?;

        let rows = match config.data_source {
            DataSource::Local(rows) => {
                Rows::Local(MemoryTable::new(config.columns.clone(), rows, transform)?)
            }
            DataSource::Remote(source) => Rows::Remote(source),
        };

        let grid = Self {
            inner: Arc::new(GridInner {
                table_id: table_id.to_string(),
                columns: config.columns,
                rows,
                comparator: config.comparator,
                decorators: config.decorators,
                language: config.language,
                state: RwLock::new(GridState {
                    search: String::new(),
                    order: config.initial_order,
                    start: 0,
                    length: config.page_length,
                    latest_draw: 0,
                    status: LoadStatus::Idle,
                    view: GridView::default(),
                }),
            }),
        };
        grid.reload_local();
        debug!("mounted grid '{}' ({} columns)", table_id, grid.inner.columns.len());
        Ok(grid)
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Returns the id of the element this grid is mounted on.
    pub fn table_id(&self) -> &str {
        &self.inner.table_id
    }

    /// Returns the column layout.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.inner.columns
    }

    /// Returns `true` if paging happens at a remote source.
    pub fn is_remote(&self) -> bool {
        matches!(self.inner.rows, Rows::Remote(_))
    }

    /// Returns the comparator kind in use.
    pub fn comparator(&self) -> &str {
        &self.inner.comparator
    }

    /// Returns the localized strings.
    pub fn language(&self) -> &Language {
        &self.inner.language
    }

    /// The live search term, as of the last keystroke.
    pub fn search_term(&self) -> String {
        self.read_state().search.clone()
    }

    /// Returns the current ordering.
    pub fn order(&self) -> Option<SortOrder> {
        self.read_state().order
    }

    /// Returns the offset of the current page.
    pub fn start(&self) -> usize {
        self.read_state().start
    }

    /// Returns the request status.
    pub fn status(&self) -> LoadStatus {
        self.read_state().status.clone()
    }

    /// Returns what the grid shows.
    pub fn view(&self) -> GridView {
        self.read_state().view.clone()
    }

    /// Returns the processing indicator while a request is pending.
    pub fn processing_indicator(&self) -> Option<&str> {
        match self.read_state().status {
            LoadStatus::Processing { .. } => Some(self.inner.language.processing.as_str()),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Write methods
    // -------------------------------------------------------------------------

    /// Records the search box value and returns to the first page.
    ///
    /// Local grids re-filter immediately; remote grids need a
    /// [`refresh`](Self::refresh). Returns `false` if the term is unchanged.
    pub fn set_search(&self, term: &str) -> bool {
        self.update(|state| {
            if state.search == term {
                return false;
            }
            state.search = term.to_string();
            state.start = 0;
            true
        })
    }

    /// Sorts on `column` (index into the column layout).
    ///
    /// Unknown and non-orderable columns are ignored and `false` returned.
    pub fn order_by(&self, column: usize, direction: Direction) -> bool {
        if !self.inner.columns.get(column).is_some_and(|c| c.orderable) {
            return false;
        }
        self.update(|state| {
            state.order = Some(SortOrder { column, direction });
            state.start = 0;
            true
        })
    }

    /// Moves to the zero-based page `page`.
    pub fn set_page(&self, page: usize) -> bool {
        self.update(|state| {
            let start = state.length.map_or(0, |len| page.saturating_mul(len));
            if state.start == start {
                return false;
            }
            state.start = start;
            true
        })
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_length(&self, length: Option<usize>) -> bool {
        self.update(|state| {
            state.length = length;
            state.start = 0;
            true
        })
    }

    // -------------------------------------------------------------------------
    // Request cycle
    // -------------------------------------------------------------------------

    /// Issues the request for the current state under a fresh draw token.
    ///
    /// Any response to an earlier token becomes stale.
    pub fn next_request(&self) -> PageRequest {
        let mut state = self.write_state();
        state.latest_draw += 1;
        state.status = LoadStatus::Processing {
            draw: state.latest_draw,
        };

        let mut request = PageRequest::new(state.latest_draw)
            .start(state.start)
            .length(state.length)
            .search(state.search.clone())
            .columns(self.inner.columns.clone());
        request.order = state.order;
        request
    }

    /// Hands the outcome of request `draw` to the grid.
    ///
    /// Outcomes of superseded requests are dropped as stale. A failure of
    /// the latest request clears the rows and is returned as the error; so
    /// is an answer to it that echoes a different token, since nothing else
    /// would settle the grid.
    pub fn commit(
        &self,
        draw: u64,
        outcome: Result<PageResponse, FetchError>,
    ) -> Result<Commit, FetchError> {
        let mut state = self.write_state();
        if draw != state.latest_draw {
            debug!(
                "{}: dropping response to draw={} (latest {})",
                self.inner.table_id, draw, state.latest_draw
            );
            return Ok(Commit::Stale);
        }

        let checked = outcome.and_then(|r| {
            if r.draw != draw {
                return Err(FetchError::DrawMismatch {
                    expected: draw,
                    echoed: r.draw,
                });
            }
            r.validate(&self.inner.columns).map(|()| r)
        });
        match checked {
            Ok(response) => {
                state.view = self.render(&response);
                state.status = LoadStatus::Ready;
                Ok(Commit::Applied)
            }
            Err(err) => {
                warn!("{}: page request draw={} failed: {}", self.inner.table_id, draw, err);
                state.view = GridView {
                    draw,
                    ..GridView::default()
                };
                state.status = LoadStatus::Failed {
                    draw,
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Requests the page for the current state and commits the answer.
    pub async fn refresh(&self) -> Result<Commit, FetchError> {
        let request = self.next_request();
        let outcome = match &self.inner.rows {
            Rows::Local(table) => Ok(table.query(&request)),
            Rows::Remote(source) => source.fetch(&request).await,
        };
        self.commit(request.draw, outcome)
    }

    fn render(&self, response: &PageResponse) -> GridView {
        let rows = response
            .data
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut row = RenderedRow::render(i, record, &self.inner.columns);
                for decorator in &self.inner.decorators {
                    decorator.decorate(&mut row, record);
                }
                row
            })
            .collect();
        GridView {
            draw: response.draw,
            records_total: response.records_total,
            records_filtered: response.records_filtered,
            rows,
        }
    }

    fn update(&self, f: impl FnOnce(&mut GridState) -> bool) -> bool {
        let changed = f(&mut self.write_state());
        if changed {
            self.reload_local();
        }
        changed
    }

    fn reload_local(&self) {
        if let Rows::Local(table) = &self.inner.rows {
            let request = self.next_request();
            let response = table.query(&request);
            if let Err(err) = self.commit(request.draw, Ok(response)) {
                warn!("{}: local page failed: {}", self.inner.table_id, err);
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, GridState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, GridState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for GridBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridBinding")
            .field("table_id", &self.inner.table_id)
            .field("remote", &self.is_remote())
            .field("comparator", &self.inner.comparator)
            .field("state", &*self.read_state())
            .finish_non_exhaustive()
    }
}
