//! In-memory filtering, searching and sorting.
//!
//! Everything here is a pure function over the records of one fetch; there
//! is no index and no incremental state. Sorting compares field values as
//! strings, exactly like the page it replaces - numeric-looking fields
//! therefore sort lexicographically ("10" before "9"), which is intended
//! behavior, not a defect to fix here.

use crate::records::Record;

/// Which field to sort by and in which direction.
///
/// Selecting the field that is already active flips the direction;
/// selecting a different field resets to ascending.
#[derive(Clone, Debug)]
pub struct SortConfig {
    key: Option<String>,
    ascending: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self { key: None, ascending: true }
    }
}

impl SortConfig {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.ascending = !self.ascending;
        } else {
            self.key = Some(key.to_owned());
            self.ascending = true;
        }
    }
}

/// One view's filter state: exact-match field filters, a free-text search
/// term, and the sort selection.
#[derive(Clone, Debug, Default)]
pub struct Query {
    filters: Vec<(String, String)>,
    search: String,
    pub sort: SortConfig,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an exact-match filter on a field. An empty value clears the
    /// filter, mirroring the "no selection" dropdown state.
    pub fn set_filter(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        self.filters.retain(|(name, _)| name != field);
        if !value.is_empty() {
            self.filters.push((field.to_owned(), value));
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Applies filters, then search, then the stable sort, returning
    /// references in display order. No match is an empty list, not an
    /// error.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let search = self.search.to_lowercase();
        let mut matched: Vec<&Record> = records
            .iter()
            .filter(|record| {
                self.filters
                    .iter()
                    .all(|(field, value)| record.get(field) == value)
            })
            .filter(|record| {
                search.is_empty()
                    || record
                        .fields()
                        .any(|(_, value)| value.to_lowercase().contains(&search))
            })
            .collect();

        if let Some(key) = self.sort.key() {
            matched.sort_by(|left, right| {
                let ordering = left.get(key).cmp(right.get(key));
                if self.sort.is_ascending() {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        matched
    }
}

/// Distinct non-empty values of one field, in first-seen order - the option
/// list for a filter dropdown.
pub fn field_options(records: &[Record], field: &str) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for record in records {
        let value = record.get(field).trim();
        if !value.is_empty() && !options.iter().any(|seen| seen == value) {
            options.push(value.to_owned());
        }
    }
    options
}
