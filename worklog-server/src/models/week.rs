//! Calendar weeks (Monday through Sunday)

use chrono::{Datelike, Duration, NaiveDate};

use super::ValidationError;

/// An inclusive date range covering one summary period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    start: NaiveDate,
    end: NaiveDate,
}

impl Week {
    /// The Monday..Sunday week that contains `date`.
    ///
    /// Fails only at the edges of the representable calendar.
    pub fn containing(date: NaiveDate) -> Result<Self, ValidationError> {
        let out_of_range = ValidationError::OutOfRange { field: "date" };
        let offset = Duration::days(i64::from(date.weekday().num_days_from_monday()));
        let start = date.checked_sub_signed(offset).ok_or(out_of_range.clone())?;
        let end = start
            .checked_add_signed(Duration::days(6))
            .ok_or(out_of_range)?;
        Ok(Self { start, end })
    }

    /// An arbitrary range, as submitted with a hand-written summary.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedRange {
                start: "week start",
                end: "week end",
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_starts_its_own_week() {
        let week = Week::containing(date(2024, 6, 10)).unwrap();
        assert_eq!(week.start(), date(2024, 6, 10));
        assert_eq!(week.end(), date(2024, 6, 16));
    }

    #[test]
    fn sunday_belongs_to_preceding_monday() {
        let week = Week::containing(date(2024, 6, 16)).unwrap();
        assert_eq!(week.start(), date(2024, 6, 10));
        assert_eq!(week.start().weekday(), Weekday::Mon);
        assert_eq!(week.end().weekday(), Weekday::Sun);
    }

    #[test]
    fn crosses_year_boundary() {
        // Wednesday 2025-01-01
        let week = Week::containing(date(2025, 1, 1)).unwrap();
        assert_eq!(week.start(), date(2024, 12, 30));
        assert_eq!(week.end(), date(2025, 1, 5));
    }

    #[test]
    fn leap_day_week() {
        let week = Week::containing(date(2024, 2, 28)).unwrap();
        assert_eq!(week.start(), date(2024, 2, 26));
        assert_eq!(week.end(), date(2024, 3, 3));
    }

    #[test]
    fn last_representable_week_is_an_error() {
        let err = Week::containing(NaiveDate::MAX).unwrap_err();
        assert_eq!(err, ValidationError::OutOfRange { field: "date" });
    }

    #[test]
    fn explicit_range_must_be_ordered() {
        assert!(Week::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
        let err = Week::new(date(2024, 1, 7), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }
}
