//! Localized UI strings.

/// Spanish locale bundle for the grid's labels.
pub const ES_ES_BUNDLE_URL: &str = "https://cdn.datatables.net/plug-ins/1.13.6/i18n/es-ES.json";

/// Spinner shown while a page request is pending.
pub const SPINNER_MARKUP: &str = r#"<div class="d-flex justify-content-center"><div class="spinner-border text-primary" role="status"><span class="visually-hidden">Cargando...</span></div></div>"#;

/// Where translated labels come from and what to show while loading.
///
/// Both values are opaque to this crate; they are handed to whatever
/// renders the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// URL of the externally hosted locale bundle.
    pub url: String,
    /// Markup of the processing indicator.
    pub processing: String,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            url: ES_ES_BUNDLE_URL.to_string(),
            processing: SPINNER_MARKUP.to_string(),
        }
    }
}

impl Language {
    /// Uses the bundle at `url` with the default indicator.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the processing indicator markup.
    pub fn with_processing(mut self, markup: impl Into<String>) -> Self {
        self.processing = markup.into();
        self
    }
}
