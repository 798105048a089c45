//! Export links that carry a grid's live filter.
//!
//! The export endpoint re-runs the grid's search on the server, so the
//! link must reproduce the filter exactly as it stands when the user
//! clicks, not as it stood at page load.

use log::debug;
use url::Url;

use crate::grid::GridRegistry;

/// Query parameter the export endpoint reads the filter from.
pub const FILTER_PARAM: &str = "filtro";

/// Appends `filter` to `base_path` as the `filtro` parameter.
///
/// The filter is percent-encoded as UTF-8; an empty filter still yields
/// `filtro=`.
///
/// # Example
///
/// ```
/// use rostergrid_lib::export::export_url;
///
/// assert_eq!(
///     export_url("/maestros/exportar/excel/", "garcía"),
///     "/maestros/exportar/excel/?filtro=garc%C3%ADa"
/// );
/// assert_eq!(export_url("/fup/exportar/excel/?hoja=1", ""), "/fup/exportar/excel/?hoja=1&filtro=");
/// ```
pub fn export_url(base_path: &str, filter: &str) -> String {
    let separator = if base_path.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}",
        base_path,
        separator,
        FILTER_PARAM,
        urlencoding::encode(filter)
    )
}

/// Builds the export URL for the grid mounted on `table_id`.
///
/// Returns `None` if no such grid is mounted.
pub fn build_export_url(registry: &GridRegistry, table_id: &str, base_path: &str) -> Option<String> {
    let Some(grid) = registry.get(table_id) else {
        debug!("export requested for unmounted grid '{}'", table_id);
        return None;
    };
    Some(export_url(base_path, &grid.search_term()))
}

/// Recovers the decoded filter from an export URL.
///
/// Relative URLs are accepted. Returns `None` when the URL has no
/// `filtro` parameter.
pub fn export_filter_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(url)))
        .ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == FILTER_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Where a click sends the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    To(String),
}

/// Binds an export button to a grid and an export endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportAction {
    pub button_id: String,
    pub table_id: String,
    pub base_path: String,
}

impl ExportAction {
    pub fn new(
        button_id: impl Into<String>,
        table_id: impl Into<String>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            button_id: button_id.into(),
            table_id: table_id.into(),
            base_path: base_path.into(),
        }
    }

    /// Handles a click on the button; `None` if the grid is not mounted.
    pub fn on_click(&self, registry: &GridRegistry) -> Option<Navigation> {
        build_export_url(registry, &self.table_id, &self.base_path).map(Navigation::To)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::grid::DataSource;
    use crate::grid::Document;
    use crate::grid::Element;
    use crate::grid::GridBinding;
    use crate::grid::GridConfig;
    use crate::model::ColumnSpec;
    use crate::search::ComparatorRegistry;

    fn registry_with_grid(table_id: &str) -> GridRegistry {
        let document = Document::new().with(Element::new(table_id));
        let config = GridConfig::new(
            vec![ColumnSpec::new(0)],
            DataSource::Local(Vec::new()),
            Arc::new(ComparatorRegistry::accent_neutral()),
        );
        let mut registry = GridRegistry::new();
        if let Some(grid) = GridBinding::mount(&document, table_id, config).unwrap() {
            registry.insert(grid);
        }
        registry
    }

    #[test]
    fn test_export_url_uses_live_filter() {
        let registry = registry_with_grid("tablaMaestros");
        let base = "/maestros/exportar/excel/";
        assert_eq!(
            build_export_url(&registry, "tablaMaestros", base).as_deref(),
            Some("/maestros/exportar/excel/?filtro=")
        );

        registry.get("tablaMaestros").unwrap().set_search("garcía");
        let url = build_export_url(&registry, "tablaMaestros", base).unwrap();
        assert_eq!(url, "/maestros/exportar/excel/?filtro=garc%C3%ADa");
        assert_eq!(export_filter_from_url(&url).as_deref(), Some("garcía"));
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let url = export_url("/fup/exportar/excel/", "a&b=c d/é");
        assert_eq!(url, "/fup/exportar/excel/?filtro=a%26b%3Dc%20d%2F%C3%A9");
        assert_eq!(export_filter_from_url(&url).as_deref(), Some("a&b=c d/é"));
    }

    #[test]
    fn test_missing_grid_is_a_no_op() {
        let registry = GridRegistry::new();
        let action = ExportAction::new("export-excel-btn", "tablaMaestros", "/maestros/exportar/excel/");
        assert_eq!(action.on_click(&registry), None);
    }

    #[test]
    fn test_click_navigates() {
        let registry = registry_with_grid("tablaFUPs");
        registry.get("tablaFUPs").unwrap().set_search("PÉREZ");
        let action = ExportAction::new("export-excel-fup-btn", "tablaFUPs", "/fup/exportar/excel/");
        assert_eq!(
            action.on_click(&registry),
            Some(Navigation::To("/fup/exportar/excel/?filtro=P%C3%89REZ".into()))
        );
    }

    #[test]
    fn test_filter_absent_from_url() {
        assert_eq!(export_filter_from_url("/maestros/exportar/excel/"), None);
    }
}
