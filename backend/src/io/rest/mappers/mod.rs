//! Conversions between the `shared` DTOs and the domain models.
//!
//! Dates cross the wire as `YYYY-MM-DD` strings and are parsed here, so a
//! malformed date is rejected before any service is called.

pub mod attendance_mapper;
pub mod group_mapper;
pub mod student_mapper;
pub mod transaction_mapper;

pub use attendance_mapper::AttendanceMapper;
pub use group_mapper::GroupMapper;
pub use student_mapper::StudentMapper;
pub use transaction_mapper::TransactionMapper;

use anyhow::{Context, Result};
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

/// Absent or blank dates stay `None` and default to today in the services
pub fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date(None).unwrap(), None);
        assert_eq!(parse_optional_date(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_date(Some("2024-03-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(parse_optional_date(Some("01/03/2024")).is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_format_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        assert_eq!(format_date(date), "2023-09-01");
    }
}
