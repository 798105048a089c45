//! Cell value enum for row tuples

use std::borrow::Cow;

use serde::Deserialize;
use serde::Serialize;

/// A single cell of a row tuple as it travels over the paging protocol.
///
/// Paging endpoints answer with rows of arbitrary JSON scalars. Text cells
/// may be plain (`"GARCÍA LÓPEZ"`) or pre-rendered markup
/// (`<span class="badge">ACTIVO</span>`); the comparator kind decides which
/// reading applies.
///
/// # Example
///
/// ```
/// use rostergrid_lib::model::CellValue;
///
/// let name = CellValue::from("Álvarez");
/// let id = CellValue::from(42i64);
/// let misplaced = CellValue::from(true);
/// let empty = CellValue::Null;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// JSON `null`.
    #[default]
    Null,
    /// JSON boolean, typically an out-of-band flag.
    Bool(bool),
    /// JSON number.
    Number(serde_json::Number),
    /// JSON string, plain text or markup.
    Text(String),
    /// Arrays and objects, kept opaque.
    Json(serde_json::Value),
}

impl CellValue {
    /// Returns `true` if this is a null cell.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the text content if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the type name of this cell.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "bool",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Json(_) => "json",
        }
    }

    /// Truthiness as the page script sees it: `true`, non-zero numbers,
    /// non-empty strings and any array or object.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Null => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Json(_) => true,
        }
    }

    /// The text a grid cell shows for this value.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            CellValue::Number(n) => Cow::Owned(n.to_string()),
            CellValue::Text(s) => Cow::Borrowed(s),
            CellValue::Json(v) => Cow::Owned(v.to_string()),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(v.into())
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v.into())
    }
}

impl From<u64> for CellValue {
    fn from(v: u64) -> Self {
        CellValue::Number(v.into())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        serde_json::Number::from_f64(v)
            .map(CellValue::Number)
            .unwrap_or(CellValue::Null)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => CellValue::Number(n),
            serde_json::Value::String(s) => CellValue::Text(s),
            other => CellValue::Json(other),
        }
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}
