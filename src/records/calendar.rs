//! Working days and holidays.
//!
//! Both entities live on the same physical calendar sheet: working days in
//! columns A-D, holidays in columns F-H. Column E is a spacer nobody owns.

use crate::records::{ColumnMap, Field, FieldKind, ValidationError};
use chrono::{Datelike, NaiveDate};

/// Columns A-D of the calendar sheet.
pub static WORKING_DAY_COLUMNS: ColumnMap = ColumnMap {
    entity: "working",
    fields: &[
        Field { name: "date", offset: 0, kind: FieldKind::Date },
        Field { name: "day", offset: 1, kind: FieldKind::Text },
        Field { name: "week", offset: 2, kind: FieldKind::Text },
        Field { name: "month", offset: 3, kind: FieldKind::Text },
    ],
};

/// Columns F-H of the calendar sheet.
pub static HOLIDAY_COLUMNS: ColumnMap = ColumnMap {
    entity: "holiday",
    fields: &[
        Field { name: "date", offset: 5, kind: FieldKind::Date },
        Field { name: "day", offset: 6, kind: FieldKind::Text },
        Field { name: "reason", offset: 7, kind: FieldKind::Text },
    ],
};

/// A working day about to be inserted. Only the date is user input; the
/// remaining columns are derived from it.
#[derive(Clone, Debug, Default)]
pub struct WorkingDayDraft {
    /// Canonical `DD/MM/YYYY`
    pub date: String,
}

impl WorkingDayDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "date" });
        }
        Ok(())
    }

    /// Produces the positional row for columns A-D. Derived columns fall
    /// back to empty strings when the date does not parse, matching how the
    /// sheet tolerates hand-entered oddities.
    pub fn into_row(&self) -> Result<Vec<String>, ValidationError> {
        self.validate()?;
        Ok(vec![
            self.date.clone(),
            day_name(&self.date),
            week_number(&self.date).map(|week| week.to_string()).unwrap_or_default(),
            month_number(&self.date).map(|month| month.to_string()).unwrap_or_default(),
        ])
    }
}

/// A holiday about to be inserted.
#[derive(Clone, Debug, Default)]
pub struct HolidayDraft {
    /// Canonical `DD/MM/YYYY`
    pub date: String,
    pub reason: String,
}

impl HolidayDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "date" });
        }
        if self.reason.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "reason" });
        }
        Ok(())
    }

    /// Produces the positional row for columns F-H.
    pub fn into_row(&self) -> Result<Vec<String>, ValidationError> {
        self.validate()?;
        Ok(vec![
            self.date.clone(),
            day_name(&self.date),
            self.reason.clone(),
        ])
    }
}

fn parse_canonical(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%d/%m/%Y").ok()
}

/// Short English weekday name ("Mon".."Sun") for a canonical date, or empty
/// when the date does not parse.
pub fn day_name(date: &str) -> String {
    parse_canonical(date)
        .map(|date| date.format("%a").to_string())
        .unwrap_or_default()
}

/// Week number within the year, counting partial first weeks from the day
/// of week January 1st falls on.
pub fn week_number(date: &str) -> Option<u32> {
    let date = parse_canonical(date)?;
    let january_first = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
    let past_days = (date - january_first).num_days();
    let offset = january_first.weekday().num_days_from_sunday() as i64;
    Some(((past_days + offset + 1 + 6) / 7) as u32)
}

/// Month number (1-12) for a canonical date.
pub fn month_number(date: &str) -> Option<u32> {
    parse_canonical(date).map(|date| date.month())
}
