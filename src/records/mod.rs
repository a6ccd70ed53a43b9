//! # Domain Records Module
//!
//! Maps untyped sheet rows into normalized domain records and back. One
//! generic record/column-map pair serves every entity in the workbook; the
//! per-entity column layouts, drafts and helpers live in the submodules:
//!
//! - [`calendar`]: working days and holidays
//! - [`tasks`]: checklist and delegation tasks
//! - [`directory`]: user accounts and departments

pub mod calendar;
pub mod directory;
pub mod tasks;

use crate::sheet::{normalize_date, CellValue, RawRow};
use thiserror::Error;
use uuid::Uuid;

/// Client-side validation failures, raised before any network call.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },
}

/// How a mapped field's cell content is normalized.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldKind {
    /// Plain text, taken as-is
    Text,
    /// Date or datetime, normalized to `DD/MM/YYYY [HH:MM:SS]`
    Date,
}

/// One logical field: its name, its zero-based column offset, and how its
/// content is normalized when read.
#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

/// Binds the logical field names of one entity to column offsets.
///
/// Two entities may share the same physical rows at different offsets (the
/// calendar sheet keeps working days in columns A-D and holidays in F-H),
/// so the map, not the row, defines what an entity is.
#[derive(Debug)]
pub struct ColumnMap {
    /// Entity tag, used as the synthetic id prefix
    pub entity: &'static str,
    pub fields: &'static [Field],
}

impl ColumnMap {
    /// Returns the column offset bound to a logical field name.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.offset)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }
}

/// The normalized, typed view of one sheet row.
///
/// `id` is process-local, regenerated on every fetch, and never persisted;
/// it only gives a row identity for the duration of one loaded view.
/// `row_index` is the 1-based physical sheet row and the only stable join
/// key back to the source of truth. It must always come from the fetch that
/// produced the record: external inserts and deletes shift row numbers, and
/// a write against a stale index silently corrupts an unrelated row.
#[derive(Clone, Debug)]
pub struct Record {
    pub id: String,
    pub row_index: usize,
    map: &'static ColumnMap,
    values: Vec<String>,
    original: Vec<String>,
}

impl Record {
    /// Returns the normalized value of a logical field, or the empty string
    /// when the field is not part of this record's map.
    pub fn get(&self, name: &str) -> &str {
        match self.map.index_of(name) {
            Some(index) => &self.values[index],
            None => "",
        }
    }

    /// Overwrites a field value for the current edit session. Unknown field
    /// names are ignored; edits live in memory until submitted and are
    /// discarded on the next fetch.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        match self.map.index_of(name) {
            Some(index) => self.values[index] = value.into(),
            None => log::warn!("ignoring edit to unmapped field '{}'", name),
        }
    }

    /// Iterates `(field name, value)` pairs in map order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.map
            .fields
            .iter()
            .map(|field| field.name)
            .zip(self.values.iter().map(String::as_str))
    }

    /// The column map this record was fetched through.
    pub fn map(&self) -> &'static ColumnMap {
        self.map
    }

    /// The full positional row as fetched, including columns the map does
    /// not expose.
    pub fn original_row(&self) -> &[String] {
        &self.original
    }

    /// Builds a positional row carrying every current field value at its
    /// mapped offset, with all unexposed columns preserved from the
    /// original. This is the payload for a whole-record update.
    pub fn full_patch(&self) -> Vec<String> {
        let edits: Vec<(&str, &str)> = self.fields().collect();
        build_row_patch(self, &edits)
    }
}

/// Maps one fetched row into a domain record.
///
/// `position` is the row's 0-based index in the post-header row list; the
/// physical sheet row is `position + 2` (one for 1-based numbering, one for
/// the stripped header). The index is positional: rows dropped for emptiness
/// before this one do not change it.
///
/// Returns None when every mapped field is empty - blank trailing rows are
/// routine in a live sheet and are not an error.
pub fn map_row(row: &RawRow, map: &'static ColumnMap, position: usize) -> Option<Record> {
    let values: Vec<String> = map
        .fields
        .iter()
        .map(|field| {
            let text = row
                .get(field.offset)
                .unwrap_or(&CellValue::Empty)
                .to_text();
            match field.kind {
                FieldKind::Text => text,
                FieldKind::Date => normalize_date(&text),
            }
        })
        .collect();

    if values.iter().all(String::is_empty) {
        return None;
    }

    Some(Record {
        id: format!("{}_{}", map.entity, Uuid::new_v4().simple()),
        row_index: position + 2,
        map,
        values,
        original: row.iter().map(CellValue::to_text).collect(),
    })
}

/// Reconstructs a full positional row from a record's original values,
/// overwriting only the mapped offsets named in `edits`.
///
/// Columns the map does not expose keep their fetched values, so an update
/// never truncates a row to the edited fields. Offsets beyond the fetched
/// row length are padded with empty strings.
pub fn build_row_patch(record: &Record, edits: &[(&str, &str)]) -> Vec<String> {
    let mut patch = record.original.clone();
    for (name, value) in edits {
        let Some(offset) = record.map.offset_of(name) else {
            log::warn!("ignoring patch for unmapped field '{}'", name);
            continue;
        };
        if patch.len() <= offset {
            patch.resize(offset + 1, String::new());
        }
        patch[offset] = (*value).to_owned();
    }
    patch
}
