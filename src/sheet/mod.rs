//! # Sheet Boundary Module
//!
//! This module is the typed boundary between the loosely-typed tabular wire
//! format and the rest of the crate. It classifies incoming cell values into
//! a closed set of variants, locates and decodes the response payload the
//! read endpoints wrap in non-JSON text, and normalizes date cells into the
//! single canonical format the domain records use.

pub mod cell;
pub mod envelope;

pub use cell::{normalize_date, CellValue};
pub use envelope::{parse_rows, EnvelopeError};

/// One fetched row: an ordered sequence of cells positionally aligned to
/// sheet columns A, B, C, ... Trailing absent cells are simply not present.
pub type RawRow = Vec<CellValue>;
