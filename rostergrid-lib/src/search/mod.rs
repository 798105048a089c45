//! Accent-insensitive search and sort.
//!
//! - [`strip_diacritics`] / [`normalize`] - the diacritic-free comparison form
//! - [`ComparatorRegistry`] - named comparator kinds handed to each grid
//! - [`matches_query`] - the word-by-word row filter shared by local grids and
//!   the paging server

mod comparator;
mod normalize;

pub use comparator::*;
pub use normalize::*;

use crate::model::ColumnSpec;
use crate::model::RowRecord;

/// Splits a raw search term into folded, diacritic-free words.
pub fn query_words(term: &str) -> Vec<String> {
    strip_diacritics(term)
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Returns `true` if every query word occurs in some searchable cell of
/// `row`. An empty word list matches everything.
pub fn matches_query(
    row: &RowRecord,
    columns: &[ColumnSpec],
    transform: &dyn SearchTransform,
    words: &[String],
) -> bool {
    if words.is_empty() {
        return true;
    }
    let keys: Vec<String> = columns
        .iter()
        .filter(|c| c.searchable)
        .filter_map(|c| row.cell(c))
        .filter_map(|cell| transform.search_key(cell))
        .collect();
    words
        .iter()
        .all(|word| keys.iter().any(|key| key.contains(word.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_words() {
        assert_eq!(query_words("  García  LÓPEZ "), vec!["garcia", "lopez"]);
        assert!(query_words("   ").is_empty());
    }

    #[test]
    fn test_accent_and_case_insensitive_match() {
        let columns = vec![ColumnSpec::new(0)];
        let words = query_words("alvarez");
        let alvarez: RowRecord = ["Álvarez"].into_iter().collect();
        let beltran: RowRecord = ["Beltrán"].into_iter().collect();
        assert!(matches_query(&alvarez, &columns, &AccentNeutral, &words));
        assert!(!matches_query(&beltran, &columns, &AccentNeutral, &words));
    }

    #[test]
    fn test_every_word_must_match_somewhere() {
        let columns = vec![ColumnSpec::new(0), ColumnSpec::new(1)];
        let row: RowRecord = ["JUAN PÉREZ", "CCT-0042"].into_iter().collect();
        assert!(matches_query(&row, &columns, &AccentNeutral, &query_words("perez 0042")));
        assert!(!matches_query(&row, &columns, &AccentNeutral, &query_words("perez 0043")));
    }

    #[test]
    fn test_unsearchable_columns_are_skipped() {
        let columns = vec![ColumnSpec::new(0), ColumnSpec::action(1)];
        let row: RowRecord = ["Ana", "<a href=\"/editar/\">editar</a>"].into_iter().collect();
        assert!(!matches_query(&row, &columns, &HtmlAccentNeutral, &query_words("editar")));
    }
}
