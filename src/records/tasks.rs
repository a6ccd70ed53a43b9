//! Checklist and delegation tasks.
//!
//! Both sheets share one layout: a timestamp in column A, the task id in
//! column B, then the descriptive columns through J. The checklist map does
//! not expose the timestamp; the delegation map shows it read-only.

use crate::client::writer::Operation;
use crate::records::{ColumnMap, Field, FieldKind, Record};
use crate::session::Session;
use chrono::{Local, Utc};
use uuid::Uuid;

/// Columns B-J of the checklist sheet. Column A is the creation timestamp,
/// deliberately unmapped: the edit form never shows it.
pub static CHECKLIST_COLUMNS: ColumnMap = ColumnMap {
    entity: "checklist",
    fields: &[
        Field { name: "task_id", offset: 1, kind: FieldKind::Text },
        Field { name: "department", offset: 2, kind: FieldKind::Text },
        Field { name: "given_by", offset: 3, kind: FieldKind::Text },
        Field { name: "name", offset: 4, kind: FieldKind::Text },
        Field { name: "description", offset: 5, kind: FieldKind::Text },
        Field { name: "end_date", offset: 6, kind: FieldKind::Date },
        Field { name: "frequency", offset: 7, kind: FieldKind::Text },
        Field { name: "reminders", offset: 8, kind: FieldKind::Text },
        Field { name: "attachment", offset: 9, kind: FieldKind::Text },
    ],
};

/// Columns A-J of the delegation sheet.
pub static DELEGATION_COLUMNS: ColumnMap = ColumnMap {
    entity: "delegation",
    fields: &[
        Field { name: "timestamp", offset: 0, kind: FieldKind::Date },
        Field { name: "task_id", offset: 1, kind: FieldKind::Text },
        Field { name: "department", offset: 2, kind: FieldKind::Text },
        Field { name: "given_by", offset: 3, kind: FieldKind::Text },
        Field { name: "name", offset: 4, kind: FieldKind::Text },
        Field { name: "description", offset: 5, kind: FieldKind::Text },
        Field { name: "end_date", offset: 6, kind: FieldKind::Date },
        Field { name: "frequency", offset: 7, kind: FieldKind::Text },
        Field { name: "reminders", offset: 8, kind: FieldKind::Text },
        Field { name: "attachment", offset: 9, kind: FieldKind::Text },
    ],
};

/// Offset of the checklist timestamp column (A).
const TIMESTAMP_OFFSET: usize = 0;

/// Builds the task-id-keyed update for one (possibly edited) checklist task.
///
/// The row carries every column A-J, but the timestamp offset is sent as an
/// empty string: the backend keeps the stored value for blank cells, and
/// echoing the fetched, re-formatted timestamp back would corrupt it.
pub fn checklist_update_op(record: &Record, sheet: &str) -> Operation {
    let mut row = record.full_patch();
    if row.len() <= TIMESTAMP_OFFSET {
        row.resize(TIMESTAMP_OFFSET + 1, String::new());
    }
    row[TIMESTAMP_OFFSET] = String::new();
    Operation::UpdateTask {
        sheet: sheet.to_owned(),
        task_id: record.get("task_id").to_owned(),
        row,
    }
}

/// Builds the delete for one task row. `record.row_index` must come from
/// the fetch the user is looking at.
pub fn delete_op(record: &Record, sheet: &str) -> Operation {
    Operation::Delete { sheet: sheet.to_owned(), row_index: record.row_index }
}

/// Checklist visibility: admins see everything, everyone else sees only
/// tasks assigned to them by name.
pub fn visible_checklist<'a>(tasks: &'a [Record], session: &Session) -> Vec<&'a Record> {
    if session.can_see_all() {
        return tasks.iter().collect();
    }
    tasks
        .iter()
        .filter(|task| session.is_named(task.get("name")))
        .collect()
}

/// Delegation visibility: admins see everything, everyone else sees tasks
/// they are assigned or that they gave out.
pub fn visible_delegation<'a>(tasks: &'a [Record], session: &Session) -> Vec<&'a Record> {
    if session.can_see_all() {
        return tasks.iter().collect();
    }
    tasks
        .iter()
        .filter(|task| {
            session.is_named(task.get("name")) || session.is_named(task.get("given_by"))
        })
        .collect()
}

/// Generates a new task id in the sheet's established format: `TASK`, the
/// current epoch milliseconds, and a short random suffix.
pub fn generate_task_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("TASK{}{}", Utc::now().timestamp_millis(), &suffix[..6])
}

/// The current local time in the sheet's timestamp format.
pub fn timestamp_now() -> String {
    Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
}
