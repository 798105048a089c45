//! A minimal page model: the elements grids and export buttons attach to.

use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::model::RowRecord;

/// Data attribute that carries a remote grid's endpoint.
pub const AJAX_URL_ATTR: &str = "ajax-url";

/// Class marking tables that initialize as client-side grids.
pub const DATATABLE_CLASS: &str = "datatable-search";

/// One element of the page.
///
/// Only what grid setup reads is modelled: id, classes, `data-*`
/// attributes, and for static tables the rows already in the markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub data: HashMap<String, String>,
    pub rows: Vec<RowRecord>,
}

impl Element {
    /// Creates an element with an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Creates an element without an id.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Adds a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    /// Sets a `data-*` attribute (name without the `data-` prefix).
    pub fn with_data(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Sets the static rows of a table element.
    pub fn with_rows(mut self, rows: Vec<RowRecord>) -> Self {
        self.rows = rows;
        self
    }

    /// Returns `true` if the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Returns a `data-*` attribute.
    pub fn data_attr(&self, name: &str) -> Option<&str> {
        self.data.get(name).map(String::as_str)
    }
}

/// The elements of one page, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element.
    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Appends an element.
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Finds the element with `id`.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    /// Returns `true` if an element with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    /// Elements carrying `class`, in document order.
    pub fn by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.has_class(class))
    }
}
