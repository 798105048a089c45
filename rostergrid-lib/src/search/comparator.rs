//! Named comparator kinds.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use super::normalize::normalize;
use super::normalize::strip_markup;
use crate::model::CellValue;

/// Kind name for plain text cells.
pub const STRING_ACCENT_NEUTRAL: &str = "string-accent-neutral";

/// Kind name for cells that may carry markup.
pub const HTML_ACCENT_NEUTRAL: &str = "html-accent-neutral";

/// Turns a cell into the form used for filtering and sorting.
///
/// Implementors only provide [`prepare`](SearchTransform::prepare); the
/// folded search key and the ordering are derived from it.
pub trait SearchTransform: Send + Sync {
    /// Maps a cell to its comparison form. Cells the transform does not
    /// understand must come back unchanged.
    fn prepare<'a>(&self, value: &'a CellValue) -> Cow<'a, CellValue>;

    /// Case-folded text used for substring filtering, `None` for null cells.
    fn search_key(&self, value: &CellValue) -> Option<String> {
        match self.prepare(value).as_ref() {
            CellValue::Null => None,
            prepared => Some(prepared.display().to_lowercase()),
        }
    }

    /// Total order over cells: null, then flags, then numbers, then text.
    ///
    /// Text compares by folded key; equal keys fall back to the raw cells,
    /// so `Alvarez` and `Álvarez` never compare equal.
    fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        let (prepared_a, prepared_b) = (self.prepare(a), self.prepare(b));
        match (prepared_a.as_ref(), prepared_b.as_ref()) {
            (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
            (CellValue::Number(x), CellValue::Number(y)) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (CellValue::Text(x), CellValue::Text(y)) => x
                .to_lowercase()
                .cmp(&y.to_lowercase())
                .then_with(|| x.cmp(y))
                .then_with(|| a.display().cmp(&b.display())),
            (x, y) if rank(x) == rank(y) => x.display().cmp(&y.display()),
            (x, y) => rank(x).cmp(&rank(y)),
        }
    }
}

fn rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Null => 0,
        CellValue::Bool(_) => 1,
        CellValue::Number(_) => 2,
        CellValue::Text(_) => 3,
        CellValue::Json(_) => 4,
    }
}

/// Diacritic-insensitive handling of plain text cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccentNeutral;

impl SearchTransform for AccentNeutral {
    fn prepare<'a>(&self, value: &'a CellValue) -> Cow<'a, CellValue> {
        normalize(value)
    }
}

/// Diacritic-insensitive handling of cells holding markup.
///
/// Visible text is extracted before normalizing so tag names and attribute
/// values never reach the comparison key.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlAccentNeutral;

impl SearchTransform for HtmlAccentNeutral {
    fn prepare<'a>(&self, value: &'a CellValue) -> Cow<'a, CellValue> {
        match value {
            CellValue::Text(markup) => {
                let text = CellValue::Text(strip_markup(markup).into_owned());
                Cow::Owned(normalize(&text).into_owned())
            }
            other => Cow::Borrowed(other),
        }
    }
}

/// A set of named comparator kinds.
///
/// Each grid holds the registry through an `Arc` and looks its kind up at
/// mount time; nothing here is global.
///
/// # Example
///
/// ```
/// use rostergrid_lib::model::CellValue;
/// use rostergrid_lib::search::{ComparatorRegistry, HTML_ACCENT_NEUTRAL};
///
/// let registry = ComparatorRegistry::accent_neutral();
/// let kind = registry.get(HTML_ACCENT_NEUTRAL).unwrap();
/// let key = kind.search_key(&CellValue::from("<b>Beltrán</b>"));
/// assert_eq!(key.as_deref(), Some("beltran"));
/// ```
#[derive(Clone, Default)]
pub struct ComparatorRegistry {
    kinds: HashMap<String, Arc<dyn SearchTransform>>,
}

impl ComparatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with both accent-neutral kinds registered.
    pub fn accent_neutral() -> Self {
        Self::new()
            .with(STRING_ACCENT_NEUTRAL, AccentNeutral)
            .with(HTML_ACCENT_NEUTRAL, HtmlAccentNeutral)
    }

    /// Registers `transform` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, transform: impl SearchTransform + 'static) {
        self.kinds.insert(name.into(), Arc::new(transform));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, transform: impl SearchTransform + 'static) -> Self {
        self.register(name, transform);
        self
    }

    /// Looks up a kind by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SearchTransform>> {
        self.kinds.get(name).cloned()
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Returns the registered kind names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparatorRegistry")
            .field("kinds", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_registry_kinds() {
        let registry = ComparatorRegistry::accent_neutral();
        assert_eq!(registry.names(), vec![HTML_ACCENT_NEUTRAL, STRING_ACCENT_NEUTRAL]);
        assert!(registry.get("string").is_none());
    }

    #[test]
    fn test_search_key_folds_case_and_accents() {
        let key = AccentNeutral.search_key(&text("ÁLVAREZ"));
        assert_eq!(key.as_deref(), Some("alvarez"));
        assert_eq!(AccentNeutral.search_key(&CellValue::Null), None);
        assert_eq!(AccentNeutral.search_key(&CellValue::from(15i64)).as_deref(), Some("15"));
    }

    #[test]
    fn test_html_kind_ignores_tags() {
        let cell = text(r#"<span class="badge bg-warning">Inactivo</span>"#);
        assert_eq!(HtmlAccentNeutral.search_key(&cell).as_deref(), Some("inactivo"));
        // the string kind would keep the tag text
        assert!(AccentNeutral.search_key(&cell).unwrap().contains("badge"));
    }

    #[test]
    fn test_compare_orders_accented_text_with_bare_text() {
        let mut names = vec![text("Ortiz"), text("Álvarez"), text("beltrán"), text("Alvarado")];
        names.sort_by(|a, b| AccentNeutral.compare(a, b));
        let sorted: Vec<_> = names.iter().map(|c| c.display().into_owned()).collect();
        assert_eq!(sorted, vec!["Alvarado", "Álvarez", "beltrán", "Ortiz"]);
    }

    #[test]
    fn test_compare_breaks_folded_ties_on_raw_text() {
        let bare = text("Alvarez");
        let accented = text("Álvarez");
        assert_eq!(AccentNeutral.compare(&bare, &accented), Ordering::Less);
        assert_eq!(AccentNeutral.compare(&accented, &bare), Ordering::Greater);
        assert_eq!(AccentNeutral.compare(&accented, &accented.clone()), Ordering::Equal);

        // Same order whichever comes first in the input.
        let mut forward = vec![accented.clone(), bare.clone()];
        let mut backward = vec![bare, accented];
        forward.sort_by(|a, b| AccentNeutral.compare(a, b));
        backward.sort_by(|a, b| AccentNeutral.compare(a, b));
        assert_eq!(forward, backward);

        let tagged = text("<b>Álvarez</b>");
        let plain = text("<b>Alvarez</b>");
        assert_eq!(HtmlAccentNeutral.compare(&plain, &tagged), Ordering::Less);
    }

    #[test]
    fn test_compare_is_total_across_types() {
        let values = [text("a"), CellValue::from(2i64), CellValue::Null, CellValue::from(true)];
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| HtmlAccentNeutral.compare(a, b));
        let kinds: Vec<_> = sorted.iter().map(CellValue::type_name).collect();
        assert_eq!(kinds, vec!["null", "bool", "number", "text"]);
    }
}
