use thiserror::Error;

/// Main error type for the sheetlink crate.
/// Aggregates errors from configuration, fetching, validation and writing,
/// so callers that do not care which stage failed can hold one type.
///
/// Every variant renders as a plain message: failures in this system are
/// surfaced to the user once, never coded, logged durably, or retried.
#[derive(Error, Debug)]
pub enum SheetLinkError {
    #[error("{0}")]
    WithContextError(String),

    // Configuration errors
    #[error("{0}")]
    ConfigError(#[from] crate::config::ConfigError),

    // Sheet module errors
    #[error("{0}")]
    EnvelopeError(#[from] crate::sheet::EnvelopeError),

    // Record module errors
    #[error("{0}")]
    ValidationError(#[from] crate::records::ValidationError),

    // Client module errors
    #[error("{0}")]
    TransportError(#[from] crate::client::transport::TransportError),

    #[error("{0}")]
    FetchError(#[from] crate::client::reader::FetchError),

    #[error("{0}")]
    WriteError(#[from] crate::client::writer::WriteError),

    #[error("{0}")]
    BatchError(#[from] crate::client::batch::BatchError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SheetLinkError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SheetLinkError::WithContextError(format!("{}: {}", message, e)))
    }
}
