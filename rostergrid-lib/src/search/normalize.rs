//! Diacritic stripping and markup-to-text extraction.

use std::borrow::Cow;
use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

use crate::model::CellValue;

/// The Combining Diacritical Marks block.
pub const COMBINING_MARKS: RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Returns `true` if `c` is a combining diacritical mark.
pub fn is_combining_mark(c: char) -> bool {
    COMBINING_MARKS.contains(&c)
}

/// Decomposes `text` to NFD and drops every combining diacritical mark.
///
/// Case is left untouched.
///
/// ```
/// use rostergrid_lib::search::strip_diacritics;
///
/// assert_eq!(strip_diacritics("México"), "Mexico");
/// assert_eq!(strip_diacritics("PEÑA"), "PENA");
/// ```
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Maps a cell to its diacritic-free comparison form.
///
/// Only text cells are rewritten. Every other cell comes back borrowed, so
/// comparators stay total over numbers, flags and opaque JSON.
pub fn normalize(value: &CellValue) -> Cow<'_, CellValue> {
    match value {
        CellValue::Text(text) => Cow::Owned(CellValue::Text(strip_diacritics(text))),
        other => Cow::Borrowed(other),
    }
}

/// Extracts the visible text of a markup fragment.
///
/// Tags are dropped and the common character references are decoded. A `<`
/// that never closes is kept as literal text.
pub fn strip_markup(markup: &str) -> Cow<'_, str> {
    if !markup.contains('<') && !markup.contains('&') {
        return Cow::Borrowed(markup);
    }

    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = &rest[open..];
                break;
            }
        }
    }
    text.push_str(rest);

    Cow::Owned(decode_entities(&text))
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_diacritics_collapses_accented_forms() {
        assert_eq!(strip_diacritics("México"), strip_diacritics("Mexico"));
        assert_eq!(strip_diacritics("Álvarez Núñez"), "Alvarez Nunez");
        assert_eq!(strip_diacritics("ÜBER"), "UBER");
    }

    #[test]
    fn test_strip_diacritics_handles_decomposed_input() {
        // "e" followed by U+0301 COMBINING ACUTE ACCENT
        assert_eq!(strip_diacritics("Jose\u{0301}"), "Jose");
    }

    #[test]
    fn test_strip_diacritics_keeps_case() {
        assert_eq!(strip_diacritics("García"), "Garcia");
        assert_eq!(strip_diacritics("GARCÍA"), "GARCIA");
    }

    #[test]
    fn test_normalize_is_idempotent_and_mark_free() {
        for sample in ["Beltrán", "ça va", "Ærø", "ḱ̷̀", "plain", ""] {
            let once = strip_diacritics(sample);
            assert!(!once.chars().any(is_combining_mark), "{sample}");
            assert_eq!(strip_diacritics(&once), once);
        }
    }

    #[test]
    fn test_normalize_passes_non_text_through() {
        let values = [
            CellValue::Null,
            CellValue::from(true),
            CellValue::from(12i64),
            CellValue::Json(serde_json::json!({"html": "<b>x</b>"})),
        ];
        for value in &values {
            match normalize(value) {
                Cow::Borrowed(same) => assert!(std::ptr::eq(same, value)),
                Cow::Owned(_) => panic!("{} was copied", value.type_name()),
            }
        }
    }

    #[test]
    fn test_normalize_rewrites_text() {
        let value = CellValue::from("Peña");
        assert_eq!(normalize(&value).as_ref(), &CellValue::from("Pena"));
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup(r#"<span class="badge bg-success">Activo</span>"#),
            "Activo"
        );
        assert_eq!(strip_markup("<b>Ñ</b> &amp; <i>Á</i>"), "Ñ & Á");
        assert_eq!(strip_markup("no tags"), "no tags");
        assert_eq!(strip_markup("a < b"), "a < b");
        assert_eq!(strip_markup("&#205;ndice &#xE9;"), "Índice é");
        assert_eq!(strip_markup("R&D;"), "R&D;");
    }
}
