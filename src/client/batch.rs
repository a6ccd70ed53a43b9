use crate::client::transport::Transport;
use crate::client::writer::{Operation, ScriptWriter, WriteError};
use thiserror::Error;

/// Batch-level failure, raised by [`BatchReport::into_result`].
#[derive(Error, Debug)]
pub enum BatchError {
    /// Some rows went through and some did not - the sheet now holds a mix
    /// of old and new values and the user must be told which count landed.
    #[error("updated {succeeded} of {attempted} rows; some submissions failed")]
    Partial { succeeded: usize, attempted: usize },

    #[error("no rows were updated")]
    Failed { attempted: usize },
}

/// Three-way outcome of a batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    Complete,
    Partial,
    Failed,
}

/// What happened to each operation of a sequential batch.
#[derive(Debug)]
pub struct BatchReport {
    attempted: usize,
    succeeded: usize,
    failures: Vec<(usize, WriteError)>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// The failed operations, as `(batch position, error)` pairs.
    pub fn failures(&self) -> &[(usize, WriteError)] {
        &self.failures
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.attempted > 0 && self.succeeded == self.attempted {
            BatchOutcome::Complete
        } else if self.succeeded > 0 {
            BatchOutcome::Partial
        } else {
            BatchOutcome::Failed
        }
    }

    /// The user-facing summary. The three outcomes produce three distinct
    /// messages; partial success is never dressed up as either extreme.
    pub fn message(&self) -> String {
        match self.outcome() {
            BatchOutcome::Complete => {
                format!("Successfully updated {} row(s)", self.succeeded)
            }
            BatchOutcome::Partial => format!(
                "Updated {} of {} row(s); some submissions failed",
                self.succeeded, self.attempted
            ),
            BatchOutcome::Failed => "No rows were updated".to_owned(),
        }
    }

    pub fn into_result(self) -> Result<usize, BatchError> {
        match self.outcome() {
            BatchOutcome::Complete => Ok(self.succeeded),
            BatchOutcome::Partial => Err(BatchError::Partial {
                succeeded: self.succeeded,
                attempted: self.attempted,
            }),
            BatchOutcome::Failed => Err(BatchError::Failed { attempted: self.attempted }),
        }
    }
}

impl<T: Transport> ScriptWriter<'_, T> {
    /// Submits a batch strictly sequentially: one request is awaited before
    /// the next begins, and a failure does not abort the remaining rows.
    /// The in-flight gate spans the whole batch.
    pub fn submit_all(&self, operations: &[Operation]) -> Result<BatchReport, WriteError> {
        if !self.try_begin() {
            return Err(WriteError::AlreadyInFlight);
        }

        let mut report = BatchReport {
            attempted: operations.len(),
            succeeded: 0,
            failures: Vec::new(),
        };
        for (position, operation) in operations.iter().enumerate() {
            match self.dispatch(operation) {
                Ok(()) => report.succeeded += 1,
                Err(error) => {
                    log::warn!(
                        "batch operation {} ('{}') failed: {}",
                        position,
                        operation.action(),
                        error
                    );
                    report.failures.push((position, error));
                }
            }
        }

        self.finish();
        Ok(report)
    }
}
