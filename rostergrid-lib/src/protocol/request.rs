//! Page request and its query-string form.

use url::form_urlencoded;

use crate::error::QueryError;
use crate::model::ColumnSpec;

/// Page size used when a request does not say otherwise.
pub const DEFAULT_PAGE_LENGTH: usize = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// The wire spelling, `asc` or `desc`.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(QueryError::UnknownDirection(other.to_string())),
        }
    }
}

/// Sort on one column, by its position in the grid's column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: usize,
    pub direction: Direction,
}

impl SortOrder {
    /// Ascending order on `column`.
    pub fn asc(column: usize) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    /// Descending order on `column`.
    pub fn desc(column: usize) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}

/// One page request of the paging protocol.
///
/// # Example
///
/// ```
/// use rostergrid_lib::protocol::{PageRequest, SortOrder};
///
/// let request = PageRequest::new(3)
///     .start(20)
///     .length(Some(10))
///     .search("garcía")
///     .order(SortOrder::desc(1));
///
/// let query = request.to_query_string();
/// assert!(query.starts_with("draw=3&start=20&length=10"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Monotonic token echoed back by the response.
    pub draw: u64,
    /// Zero-based offset of the first row.
    pub start: usize,
    /// Page size, `None` for every row (`-1` on the wire).
    pub length: Option<usize>,
    /// Global search term, sent as typed.
    pub search: String,
    /// Requested ordering.
    pub order: Option<SortOrder>,
    /// Column layout, sent so servers can honour per-column flags.
    pub columns: Vec<ColumnSpec>,
}

impl PageRequest {
    /// Creates a first-page request with default paging and no search.
    pub fn new(draw: u64) -> Self {
        Self {
            draw,
            start: 0,
            length: Some(DEFAULT_PAGE_LENGTH),
            search: String::new(),
            order: None,
            columns: Vec::new(),
        }
    }

    /// Sets the offset of the first row.
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Sets the page size.
    pub fn length(mut self, length: Option<usize>) -> Self {
        self.length = length;
        self
    }

    /// Sets the search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Sets the ordering.
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the column layout.
    pub fn columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    /// Returns the exclusive end offset of the page, `None` when unbounded.
    pub fn end(&self) -> Option<usize> {
        self.length.map(|len| self.start.saturating_add(len))
    }

    /// The query parameters, in the order a browser grid sends them.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("draw".to_string(), self.draw.to_string()),
            ("start".to_string(), self.start.to_string()),
            (
                "length".to_string(),
                self.length.map_or_else(|| "-1".to_string(), |l| l.to_string()),
            ),
            ("search[value]".to_string(), self.search.clone()),
            ("search[regex]".to_string(), "false".to_string()),
        ];

        if let Some(order) = self.order {
            pairs.push(("order[0][column]".to_string(), order.column.to_string()));
            pairs.push(("order[0][dir]".to_string(), order.direction.as_str().to_string()));
        }

        for (i, column) in self.columns.iter().enumerate() {
            pairs.push((format!("columns[{i}][data]"), column.source_index.to_string()));
            pairs.push((format!("columns[{i}][searchable]"), column.searchable.to_string()));
            pairs.push((format!("columns[{i}][orderable]"), column.orderable.to_string()));
        }

        pairs
    }

    /// Form-encodes [`to_query_pairs`](Self::to_query_pairs).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// Parses a request from a query string.
    ///
    /// Missing parameters take the endpoint defaults: draw 0, start 0,
    /// length 10, empty search, ascending order on column 0. Unknown
    /// parameters are ignored.
    pub fn from_query_str(query: &str) -> Result<Self, QueryError> {
        let mut request = PageRequest::new(0).order(SortOrder::asc(0));
        let mut columns: Vec<(usize, ColumnSpec)> = Vec::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "draw" => request.draw = parse_unsigned(&key, &value)?,
                "start" => request.start = parse_unsigned(&key, &value)?,
                "length" => {
                    let length = parse_integer(&key, &value)?;
                    request.length = match length {
                        -1 => None,
                        n if n < 0 => {
                            return Err(QueryError::Negative {
                                name: key.to_string(),
                                value: n,
                            });
                        }
                        n => Some(n as usize),
                    };
                }
                "search[value]" => request.search = value.into_owned(),
                "order[0][column]" => {
                    let column = parse_unsigned(&key, &value)?;
                    request.order = request.order.map(|o| SortOrder { column, ..o });
                }
                "order[0][dir]" => {
                    let direction = value.parse()?;
                    request.order = request.order.map(|o| SortOrder { direction, ..o });
                }
                other => {
                    if let Some((index, field)) = column_param(other) {
                        let spec = column_entry(&mut columns, index);
                        match field {
                            "data" => spec.source_index = parse_unsigned(&key, &value)?,
                            "searchable" => spec.searchable = value != "false",
                            "orderable" => spec.orderable = value != "false",
                            _ => {}
                        }
                    }
                }
            }
        }

        columns.sort_by_key(|(index, _)| *index);
        request.columns = columns.into_iter().map(|(_, spec)| spec).collect();
        Ok(request)
    }
}

fn parse_integer(name: &str, value: &str) -> Result<i64, QueryError> {
    value.trim().parse().map_err(|_| QueryError::NotAnInteger {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_unsigned<T: TryFrom<i64>>(name: &str, value: &str) -> Result<T, QueryError> {
    let n = parse_integer(name, value)?;
    T::try_from(n).map_err(|_| QueryError::Negative {
        name: name.to_string(),
        value: n,
    })
}

/// Splits `columns[3][searchable]` into `(3, "searchable")`.
fn column_param(key: &str) -> Option<(usize, &str)> {
    let rest = key.strip_prefix("columns[")?;
    let (index, rest) = rest.split_once("][")?;
    let field = rest.strip_suffix(']')?;
    Some((index.parse().ok()?, field))
}

fn column_entry(columns: &mut Vec<(usize, ColumnSpec)>, index: usize) -> &mut ColumnSpec {
    let pos = match columns.iter().position(|(i, _)| *i == index) {
        Some(pos) => pos,
        None => {
            columns.push((index, ColumnSpec::new(index)));
            columns.len() - 1
        }
    };
    &mut columns[pos].1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_use_protocol_names() {
        let request = PageRequest::new(7)
            .start(30)
            .length(Some(15))
            .search("PÉREZ")
            .order(SortOrder::desc(2));
        let pairs = request.to_query_pairs();
        let names: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "draw",
                "start",
                "length",
                "search[value]",
                "search[regex]",
                "order[0][column]",
                "order[0][dir]"
            ]
        );
        assert_eq!(pairs[5].1, "2");
        assert_eq!(pairs[6].1, "desc");
    }

    #[test]
    fn test_unbounded_length_is_minus_one() {
        let request = PageRequest::new(1).length(None);
        assert!(request.to_query_string().contains("length=-1"));
        assert_eq!(request.end(), None);
    }

    #[test]
    fn test_parse_defaults() {
        let request = PageRequest::from_query_str("").unwrap();
        assert_eq!(request.draw, 0);
        assert_eq!(request.start, 0);
        assert_eq!(request.length, Some(DEFAULT_PAGE_LENGTH));
        assert_eq!(request.search, "");
        assert_eq!(request.order, Some(SortOrder::asc(0)));
        assert!(request.columns.is_empty());
    }

    #[test]
    fn test_parse_browser_query() {
        let query = "draw=4&columns%5B0%5D%5Bdata%5D=0&columns%5B0%5D%5Bsearchable%5D=true\
                     &columns%5B1%5D%5Bdata%5D=6&columns%5B1%5D%5Borderable%5D=false\
                     &columns%5B1%5D%5Bsearchable%5D=false\
                     &order%5B0%5D%5Bcolumn%5D=1&order%5B0%5D%5Bdir%5D=desc\
                     &start=10&length=25&search%5Bvalue%5D=garc%C3%ADa&search%5Bregex%5D=false&_=1700000000";
        let request = PageRequest::from_query_str(query).unwrap();
        assert_eq!(request.draw, 4);
        assert_eq!(request.start, 10);
        assert_eq!(request.length, Some(25));
        assert_eq!(request.search, "garcía");
        assert_eq!(request.order, Some(SortOrder::desc(1)));
        assert_eq!(request.columns, vec![ColumnSpec::new(0), ColumnSpec::action(6)]);
    }

    #[test]
    fn test_query_string_round_trip() {
        let request = PageRequest::new(9)
            .start(5)
            .length(None)
            .search("Núñez & hijos")
            .order(SortOrder::asc(3))
            .columns(vec![ColumnSpec::new(0), ColumnSpec::action(1)]);
        let parsed = PageRequest::from_query_str(&request.to_query_string()).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        assert_eq!(
            PageRequest::from_query_str("start=abc"),
            Err(QueryError::NotAnInteger {
                name: "start".into(),
                value: "abc".into()
            })
        );
        assert_eq!(
            PageRequest::from_query_str("length=-5"),
            Err(QueryError::Negative {
                name: "length".into(),
                value: -5
            })
        );
        assert_eq!(
            PageRequest::from_query_str("order%5B0%5D%5Bdir%5D=up"),
            Err(QueryError::UnknownDirection("up".into()))
        );
    }
}
