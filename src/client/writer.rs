use crate::client::transport::{Transport, TransportError};
use crate::config::Config;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Errors raised while submitting a write.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    /// Another submission is still running on this writer. Appends are not
    /// idempotent, so a doubled user action must not produce two requests.
    #[error("a submission is already in progress")]
    AlreadyInFlight,

    /// Endpoint reachable but answered with a non-success status
    #[error("write failed with HTTP status {status}")]
    Status { status: u16 },

    /// Endpoint reachable, explicit failure flag or message in the body
    #[error("{message}")]
    Remote { message: String },

    #[error("failed to encode row data: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The write proxy's fixed operation set.
///
/// The remote script dictates both the operation names and the exact form
/// field names, including the inconsistencies: `deleteRow` takes `sheet`
/// where every other operation takes `sheetName`, and the task update is
/// keyed by task id rather than row index.
///
/// For `Update` and `Delete`, `row_index` must be the freshly fetched
/// `Record::row_index`; deriving or caching it corrupts unrelated rows once
/// the sheet shifts underneath.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Appends a working-day row (columns A-D) to the calendar sheet
    InsertWorkingDay { sheet: String, row: Vec<String> },
    /// Appends a holiday row (columns F-H) to the calendar sheet
    InsertHoliday { sheet: String, row: Vec<String> },
    /// Rewrites a checklist task row, keyed by its task id
    UpdateTask { sheet: String, task_id: String, row: Vec<String> },
    /// Rewrites one row in place
    Update { sheet: String, row_index: usize, row: Vec<String> },
    /// Deletes one row
    Delete { sheet: String, row_index: usize },
}

impl Operation {
    /// The remote operation name sent as the `action` field.
    pub fn action(&self) -> &'static str {
        match self {
            Self::InsertWorkingDay { .. } => "insertWorkingDay",
            Self::InsertHoliday { .. } => "insertHoliday",
            Self::UpdateTask { .. } => "updateQuickTask",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "deleteRow",
        }
    }

    /// True for operations that append instead of targeting a row. Repeating
    /// an append always adds another row; repeating an update or delete is
    /// an overwrite.
    pub fn is_append(&self) -> bool {
        matches!(self, Self::InsertWorkingDay { .. } | Self::InsertHoliday { .. })
    }

    /// Encodes the operation as the form fields the script expects.
    fn form_fields(&self) -> Result<Vec<(String, String)>, WriteError> {
        let encode = |row: &Vec<String>| {
            serde_json::to_string(row).map_err(WriteError::Encode)
        };
        let fields = match self {
            Self::InsertWorkingDay { sheet, row } | Self::InsertHoliday { sheet, row } => vec![
                ("action".to_owned(), self.action().to_owned()),
                ("sheetName".to_owned(), sheet.clone()),
                ("rowData".to_owned(), encode(row)?),
            ],
            Self::UpdateTask { sheet, task_id, row } => vec![
                ("sheetName".to_owned(), sheet.clone()),
                ("action".to_owned(), self.action().to_owned()),
                ("taskId".to_owned(), task_id.clone()),
                ("rowData".to_owned(), encode(row)?),
            ],
            Self::Update { sheet, row_index, row } => vec![
                ("sheetName".to_owned(), sheet.clone()),
                ("action".to_owned(), self.action().to_owned()),
                ("rowIndex".to_owned(), row_index.to_string()),
                ("rowData".to_owned(), encode(row)?),
            ],
            Self::Delete { sheet, row_index } => vec![
                ("action".to_owned(), self.action().to_owned()),
                ("sheet".to_owned(), sheet.clone()),
                ("rowIndex".to_owned(), row_index.to_string()),
            ],
        };
        Ok(fields)
    }
}

/// The script endpoint's response body.
#[derive(Deserialize)]
struct ScriptResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    message: Option<String>,
}

impl ScriptResponse {
    fn failure_message(self) -> String {
        self.error
            .or(self.message)
            .unwrap_or_else(|| "script endpoint reported a failure".to_owned())
    }
}

/// Submits operations to the write proxy.
///
/// A single writer admits one submission at a time: the in-flight gate turns
/// a doubled event (double click, duplicate handler firing) into
/// [`WriteError::AlreadyInFlight`] instead of a second append. There is no
/// retry policy; every failure is reported once.
pub struct ScriptWriter<'a, T: Transport> {
    config: &'a Config,
    transport: &'a T,
    in_flight: AtomicBool,
}

impl<'a, T: Transport> ScriptWriter<'a, T> {
    pub fn new(config: &'a Config, transport: &'a T) -> Self {
        Self { config, transport, in_flight: AtomicBool::new(false) }
    }

    /// Submits one operation and interprets the script's answer.
    ///
    /// Success requires both a 2xx status and `success: true` in the body;
    /// anything else surfaces the remote-provided message when present.
    pub fn submit(&self, operation: &Operation) -> Result<(), WriteError> {
        if !self.try_begin() {
            return Err(WriteError::AlreadyInFlight);
        }
        let result = self.dispatch(operation);
        self.finish();
        result
    }

    /// Claims the in-flight gate. Returns false when a submission is
    /// already running.
    pub(crate) fn try_begin(&self) -> bool {
        !self.in_flight.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn finish(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }

    pub(crate) fn dispatch(&self, operation: &Operation) -> Result<(), WriteError> {
        let fields = operation.form_fields()?;
        log::debug!("submitting '{}' to script endpoint", operation.action());

        let response = self
            .transport
            .post_form(self.config.script_url.as_str(), &fields)?;
        if !response.is_success() {
            log::warn!("'{}' failed with HTTP {}", operation.action(), response.status);
            return Err(WriteError::Status { status: response.status });
        }

        match serde_json::from_str::<ScriptResponse>(&response.body) {
            Ok(parsed) if parsed.success => Ok(()),
            Ok(parsed) => Err(WriteError::Remote { message: parsed.failure_message() }),
            // A 2xx answer that is not the script's JSON still means the
            // write did not happen as far as we can tell.
            Err(_) => Err(WriteError::Remote {
                message: "script endpoint reported a failure".to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::stub::{ok, status, StubTransport};

    fn config() -> Config {
        Config::new("abc123", "https://example.com/script/exec").unwrap()
    }

    fn field<'a>(fields: &'a [(String, String)], name: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn insert_fields() {
        let operation = Operation::InsertWorkingDay {
            sheet: "Working Day Calendar".to_owned(),
            row: vec!["12/12/2025".to_owned(), "Fri".to_owned(), "50".to_owned(), "12".to_owned()],
        };
        let fields = operation.form_fields().unwrap();
        assert_eq!(field(&fields, "action"), Some("insertWorkingDay"));
        assert_eq!(field(&fields, "sheetName"), Some("Working Day Calendar"));
        assert_eq!(
            field(&fields, "rowData"),
            Some(r#"["12/12/2025","Fri","50","12"]"#)
        );
        // Appends carry no row index at all
        assert_eq!(field(&fields, "rowIndex"), None);
        assert!(operation.is_append());
    }

    #[test]
    fn update_fields() {
        let operation = Operation::Update {
            sheet: "Whatsapp".to_owned(),
            row_index: 7,
            row: vec!["IT".to_owned()],
        };
        let fields = operation.form_fields().unwrap();
        assert_eq!(field(&fields, "action"), Some("update"));
        assert_eq!(field(&fields, "sheetName"), Some("Whatsapp"));
        assert_eq!(field(&fields, "rowIndex"), Some("7"));
        assert!(!operation.is_append());
    }

    #[test]
    fn delete_uses_sheet_not_sheet_name() {
        let operation = Operation::Delete { sheet: "Unique".to_owned(), row_index: 4 };
        let fields = operation.form_fields().unwrap();
        assert_eq!(field(&fields, "action"), Some("deleteRow"));
        assert_eq!(field(&fields, "sheet"), Some("Unique"));
        assert_eq!(field(&fields, "sheetName"), None);
        assert_eq!(field(&fields, "rowData"), None);
    }

    #[test]
    fn update_task_keyed_by_task_id() {
        let operation = Operation::UpdateTask {
            sheet: "Unique".to_owned(),
            task_id: "TASK17".to_owned(),
            row: vec![String::new(), "TASK17".to_owned()],
        };
        let fields = operation.form_fields().unwrap();
        assert_eq!(field(&fields, "action"), Some("updateQuickTask"));
        assert_eq!(field(&fields, "taskId"), Some("TASK17"));
        assert_eq!(field(&fields, "rowIndex"), None);
    }

    #[test]
    fn submit_success() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(r#"{"success":true}"#)]);
        let writer = ScriptWriter::new(&config, &transport);
        let operation = Operation::Delete { sheet: "Unique".to_owned(), row_index: 2 };
        assert!(writer.submit(&operation).is_ok());

        let requests = transport.requests.borrow();
        assert_eq!(requests[0].0, "https://example.com/script/exec");
    }

    #[test]
    fn submit_surfaces_remote_error_message() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(
            r#"{"success":false,"error":"Sheet not found"}"#,
        )]);
        let writer = ScriptWriter::new(&config, &transport);
        let operation = Operation::Delete { sheet: "Nope".to_owned(), row_index: 2 };
        match writer.submit(&operation) {
            Err(WriteError::Remote { message }) => assert_eq!(message, "Sheet not found"),
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn submit_generic_message_when_remote_gives_none() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(r#"{"success":false}"#)]);
        let writer = ScriptWriter::new(&config, &transport);
        let operation = Operation::Delete { sheet: "Unique".to_owned(), row_index: 2 };
        match writer.submit(&operation) {
            Err(WriteError::Remote { message }) => {
                assert_eq!(message, "script endpoint reported a failure")
            }
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn submit_rejects_http_failure() {
        let config = config();
        let transport = StubTransport::replying(vec![status(500, "boom")]);
        let writer = ScriptWriter::new(&config, &transport);
        let operation = Operation::Delete { sheet: "Unique".to_owned(), row_index: 2 };
        assert!(matches!(
            writer.submit(&operation),
            Err(WriteError::Status { status: 500 })
        ));
    }

    #[test]
    fn gate_rejects_a_second_submission_in_flight() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(r#"{"success":true}"#)]);
        let writer = ScriptWriter::new(&config, &transport);
        assert!(writer.try_begin());

        let operation = Operation::InsertHoliday {
            sheet: "Working Day Calendar".to_owned(),
            row: vec!["26/01/2025".to_owned(), "Sun".to_owned(), "Republic Day".to_owned()],
        };
        assert!(matches!(
            writer.submit(&operation),
            Err(WriteError::AlreadyInFlight)
        ));
        // Nothing reached the endpoint
        assert!(transport.requests.borrow().is_empty());

        writer.finish();
        assert!(writer.submit(&operation).is_ok());
    }

    #[test]
    fn missing_success_flag_is_a_failure() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(r#"{"message":"saved"}"#)]);
        let writer = ScriptWriter::new(&config, &transport);
        let operation = Operation::Delete { sheet: "Unique".to_owned(), row_index: 2 };
        match writer.submit(&operation) {
            Err(WriteError::Remote { message }) => assert_eq!(message, "saved"),
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }
}
