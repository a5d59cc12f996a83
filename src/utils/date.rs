//! Date helpers. Storage uses ISO `YYYY-MM-DD` (sortable text); the
//! institute writes dates as `DD/MM/YYYY`, which is what CSV files,
//! listings and reports use.

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;

pub const DB_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a date in the institute format only (`DD/MM/YYYY`).
pub fn parse_display(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DISPLAY_FORMAT).ok()
}

/// Parse a command-line date: `DD/MM/YYYY` or `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_display(s).or_else(|| NaiveDate::parse_from_str(s.trim(), DB_FORMAT).ok())
}

pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub fn to_db(d: &NaiveDate) -> String {
    d.format(DB_FORMAT).to_string()
}

pub fn display(d: &NaiveDate) -> String {
    d.format(DISPLAY_FORMAT).to_string()
}

/// Read back a stored date.
pub fn from_db(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DB_FORMAT).map_err(|_| AppError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_input_styles() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("15/03/2024"), Some(d));
        assert_eq!(parse_date("2024-03-15"), Some(d));
        assert_eq!(parse_date(" 15/03/2024 "), Some(d));
    }

    #[test]
    fn rejects_impossible_calendar_days() {
        assert_eq!(parse_display("31/02/2024"), None);
        assert_eq!(parse_display("2024-03-15"), None);
    }
}
