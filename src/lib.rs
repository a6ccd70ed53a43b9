//! # sheetlink
//!
//! Client library for a spreadsheet-backed admin dashboard: reads rows from
//! a remote sheet's query API, types and normalizes the cells into domain
//! records, filters/sorts/searches them in memory, and writes edits back
//! through a remote script endpoint as positional row arrays.
//!
//! ## Features
//!
//! - **Typed cell boundary**: the loosely-typed wire cells (empty, text,
//!   number, encoded date literal) become a closed variant at the envelope
//!   and never leak further
//! - **One generic reader/writer pair**: every entity is a [`records::ColumnMap`]
//!   over the same row-mapping and patch-building core, instead of
//!   per-page copies
//! - **Row-index discipline**: records carry the 1-based sheet row from the
//!   fetch that produced them, the only safe key for update and delete
//! - **Patch semantics**: updates rebuild the full positional row, so
//!   columns the edit form never showed survive a save
//! - **Sequential batches**: multi-row submissions run one at a time and
//!   report complete, partial, and failed outcomes distinctly
//! - **Explicit session context**: role checks take a [`session::Session`]
//!   value; nothing reads ambient process state
//!
//! The crate owns no persistence and no retry policy: records live for one
//! view, every edit round-trips through the remote endpoint, and a full
//! refetch is the only reconciliation strategy.
//!
//! ## Example
//!
//! ```no_run
//! use sheetlink::client::{HttpTransport, SheetReader, ScriptWriter};
//! use sheetlink::records::calendar::{WorkingDayDraft, WORKING_DAY_COLUMNS};
//! use sheetlink::client::Operation;
//! use sheetlink::config::Config;
//!
//! # fn main() -> Result<(), sheetlink::error::SheetLinkError> {
//! let config = Config::from_env()?;
//! let transport = HttpTransport::new()?;
//!
//! let reader = SheetReader::new(&config, &transport);
//! let days = reader.fetch_records(&config.sheets.calendar, &WORKING_DAY_COLUMNS)?;
//! println!("{} working days", days.len());
//!
//! let draft = WorkingDayDraft { date: "12/12/2025".to_owned() };
//! let writer = ScriptWriter::new(&config, &transport);
//! writer.submit(&Operation::InsertWorkingDay {
//!     sheet: config.sheets.calendar.clone(),
//!     row: draft.into_row()?,
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod records;
pub mod session;
pub mod sheet;

pub use client::{
    BatchError, BatchOutcome, BatchReport, FetchError, HttpTransport, Operation, ScriptWriter,
    SheetReader, Transport, TransportError, WriteError,
};
pub use config::Config;
pub use error::SheetLinkError;
pub use query::{field_options, Query, SortConfig};
pub use records::{build_row_patch, map_row, ColumnMap, Record, ValidationError};
pub use session::{Role, Session};
pub use sheet::{normalize_date, CellValue, RawRow};
