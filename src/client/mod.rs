//! # Client Module
//!
//! The network-facing half of the crate: the Sheet Reader (fetch rows,
//! decode the envelope, map into records) and the Sheet Writer (rebuild
//! positional rows, submit the script endpoint's fixed operation set).
//! Both talk to the outside world only through the [`Transport`] seam.

pub mod batch;
pub mod reader;
pub mod transport;
pub mod writer;

pub use batch::{BatchError, BatchOutcome, BatchReport};
pub use reader::{map_records, FetchError, SheetReader};
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};
pub use writer::{Operation, ScriptWriter, WriteError};
