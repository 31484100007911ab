//! Route handlers organized by area

pub mod admin;
pub mod auth;
pub mod health;
pub mod home;
pub mod summaries;

use chrono::NaiveDate;

use crate::models::ValidationError;

/// Parse a `YYYY-MM-DD` form field.
pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "must be a date in YYYY-MM-DD form",
    })
}
