//! Record filters
//!
//! Select subsets of a collection without touching it. Every filter keeps
//! the input order of the records it returns.

use crate::records::date_portion;
use std::fmt;
use std::str::FromStr;

/// Records whose boolean field equals `want`
pub fn by_boolean_field<T, F>(records: &[T], field: F, want: bool) -> Vec<&T>
where
    F: Fn(&T) -> bool,
{
    records.iter().filter(|r| field(r) == want).collect()
}

/// Filter selection for an enumerated field
///
/// `All` is the "no filter" choice of the dashboard dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<V> {
    All,
    Only(V),
}

impl<V: PartialEq> Selection<V> {
    pub fn matches(&self, value: Option<&V>) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => value == Some(wanted),
        }
    }
}

impl<V: FromStr> FromStr for Selection<V> {
    type Err = V::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

impl<V: fmt::Display> fmt::Display for Selection<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "All"),
            Selection::Only(value) => write!(f, "{}", value),
        }
    }
}

/// Records whose enumerated field equals the selected value
///
/// `Selection::All` returns every record. Records with the field missing
/// only match `All`.
pub fn by_enum_field<'a, T, V, F>(records: &'a [T], field: F, selection: &Selection<V>) -> Vec<&'a T>
where
    V: PartialEq,
    F: Fn(&T) -> Option<V>,
{
    match selection {
        Selection::All => records.iter().collect(),
        Selection::Only(_) => records
            .iter()
            .filter(|r| selection.matches(field(r).as_ref()))
            .collect(),
    }
}

/// Records whose date field, cut to its date portion, equals `iso_date`
pub fn by_exact_date<'a, T, F>(records: &'a [T], field: F, iso_date: &str) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<&str>,
{
    let wanted = date_portion(iso_date);
    records
        .iter()
        .filter(|r| field(r).map(date_portion) == Some(wanted))
        .collect()
}
