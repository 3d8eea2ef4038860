use crate::DbError;
use chrono::{Datelike, NaiveDate};

/// First day of the month `date` falls in.
pub(crate) fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    // with_day(1) is always Some for a valid date
    date.with_day(1).unwrap_or(date)
}

/// Half-open calendar-month window `[year-month-01, first day of next month)`.
/// December rolls the end of the window into January of the next year.
pub(crate) fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), DbError> {
    if !(1..=12).contains(&month) {
        return Err(DbError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }
    let invalid = || DbError::Validation(format!("invalid month {year}-{month:02}"));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_covers_exactly_one_month() {
        let (start, end) = month_window(2025, 3).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = month_window(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn month_out_of_range_is_a_validation_error() {
        assert!(matches!(month_window(2025, 0), Err(DbError::Validation(_))));
        assert!(matches!(month_window(2025, 13), Err(DbError::Validation(_))));
    }
}
