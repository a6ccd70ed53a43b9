//! User accounts and departments.
//!
//! Both live on the directory sheet: departments in columns A-B, login
//! accounts in columns D-H. The same sheet doubles as the login master, so
//! account lookup for the session also happens here.

use crate::client::writer::Operation;
use crate::records::{ColumnMap, Field, FieldKind, Record, ValidationError};
use crate::session::{names_match, Role};

/// Columns A-H of the directory sheet, account view. Column C is unused.
pub static USER_COLUMNS: ColumnMap = ColumnMap {
    entity: "user",
    fields: &[
        Field { name: "department", offset: 0, kind: FieldKind::Text },
        Field { name: "given_by", offset: 1, kind: FieldKind::Text },
        Field { name: "doer_name", offset: 3, kind: FieldKind::Text },
        Field { name: "password", offset: 4, kind: FieldKind::Text },
        Field { name: "role", offset: 5, kind: FieldKind::Text },
        Field { name: "id_email", offset: 6, kind: FieldKind::Text },
        Field { name: "number", offset: 7, kind: FieldKind::Text },
    ],
};

/// Columns A-B of the directory sheet, department view.
pub static DEPARTMENT_COLUMNS: ColumnMap = ColumnMap {
    entity: "department",
    fields: &[
        Field { name: "department", offset: 0, kind: FieldKind::Text },
        Field { name: "given_by", offset: 1, kind: FieldKind::Text },
    ],
};

/// A resolved login account.
#[derive(Clone, Debug)]
pub struct Account {
    pub name: String,
    pub role: Role,
    pub department: String,
    pub given_by: String,
    pub email: String,
}

/// Resolves a session username against the directory's doer-name column.
///
/// Matching is the system-wide exact-but-forgiving comparison; a missing
/// role cell parses to the plain user role. Returns None when nobody
/// matches, which the caller surfaces as a login problem.
pub fn lookup_account(records: &[Record], username: &str) -> Option<Account> {
    records
        .iter()
        .find(|record| {
            !record.get("doer_name").is_empty()
                && names_match(record.get("doer_name"), username)
        })
        .map(|record| Account {
            name: record.get("doer_name").to_owned(),
            role: Role::parse(record.get("role")),
            department: record.get("department").to_owned(),
            given_by: record.get("given_by").to_owned(),
            email: record.get("id_email").to_owned(),
        })
}

/// The sheet row where the next entry of this entity belongs: one past the
/// last row whose key column is non-empty, or 2 on a sheet with none.
///
/// The directory page appends by issuing a positioned update at this index,
/// so like every row-index write it must be computed from a fresh fetch.
pub fn next_row_index(records: &[Record], key_field: &str) -> usize {
    records
        .iter()
        .filter(|record| !record.get(key_field).trim().is_empty())
        .map(|record| record.row_index)
        .max()
        .map(|last| last + 1)
        .unwrap_or(2)
}

/// Builds the positioned update that appends a drafted row.
pub fn positioned_insert_op(sheet: &str, row_index: usize, row: Vec<String>) -> Operation {
    Operation::Update { sheet: sheet.to_owned(), row_index, row }
}

/// Builds the in-place update for an edited account or department row,
/// preserving whatever the other entity keeps in the same physical row.
pub fn update_op(record: &Record, sheet: &str) -> Operation {
    Operation::Update {
        sheet: sheet.to_owned(),
        row_index: record.row_index,
        row: record.full_patch(),
    }
}

/// A login account about to be added.
#[derive(Clone, Debug, Default)]
pub struct UserDraft {
    pub doer_name: String,
    pub password: String,
    pub role: String,
    pub id_email: String,
    pub number: String,
}

impl UserDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.doer_name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "doer_name" });
        }
        Ok(())
    }

    /// Positional row for columns A-H with the department columns left
    /// blank; a new account never claims them.
    pub fn into_row(&self) -> Result<Vec<String>, ValidationError> {
        self.validate()?;
        Ok(vec![
            String::new(),
            String::new(),
            String::new(),
            self.doer_name.clone(),
            self.password.clone(),
            self.role.clone(),
            self.id_email.clone(),
            self.number.clone(),
        ])
    }
}

/// A department about to be added.
#[derive(Clone, Debug, Default)]
pub struct DepartmentDraft {
    pub department: String,
    pub given_by: String,
}

impl DepartmentDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.department.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "department" });
        }
        Ok(())
    }

    /// Positional row for columns A-H with the account columns left blank.
    pub fn into_row(&self) -> Result<Vec<String>, ValidationError> {
        self.validate()?;
        let mut row = vec![self.department.clone(), self.given_by.clone()];
        row.resize(8, String::new());
        Ok(row)
    }
}
