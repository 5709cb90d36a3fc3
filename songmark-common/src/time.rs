//! Timestamp and calendar date utilities

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Date format used by provenance records
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Today's date in the operator's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Format a date the way provenance records store it (`YYYY-MM-DD`)
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}
