//! Calendar dimension math.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{DomainError, DomainResult};

/// One derived row of the calendar dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// ISO weekday, Monday = 1 .. Sunday = 7
    pub weekday: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl CalendarDay {
    pub fn new(date: NaiveDate, is_holiday: bool) -> Self {
        let weekday = date.weekday().number_from_monday();
        Self {
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            weekday,
            is_weekend: weekday >= 6,
            is_holiday,
        }
    }
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> DomainResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::invalid_date(format!("{}-{:02}", year, month)))?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| DomainError::invalid_date(format!("end of {}", start)))?;
    Ok((start, end))
}

/// Widen `[min, max]` outward to whole calendar months
pub fn expand_to_months(min: NaiveDate, max: NaiveDate) -> DomainResult<(NaiveDate, NaiveDate)> {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    let (start, _) = month_bounds(low.year(), low.month())?;
    let (_, end) = month_bounds(high.year(), high.month())?;
    Ok((start, end))
}

/// Every day of `[start, end]` inclusive
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_expands_to_its_month() {
        let (start, end) = expand_to_months(date(2025, 8, 15), date(2025, 8, 15)).unwrap();
        assert_eq!(start, date(2025, 8, 1));
        assert_eq!(end, date(2025, 8, 31));
        assert_eq!(days_inclusive(start, end).count(), 31);
    }

    #[test]
    fn test_expansion_crosses_year_boundary() {
        let (start, end) = expand_to_months(date(2024, 12, 20), date(2025, 1, 3)).unwrap();
        assert_eq!(start, date(2024, 12, 1));
        assert_eq!(end, date(2025, 1, 31));
    }

    #[test]
    fn test_iso_weekday_and_weekend() {
        // 2025-08-01 is a Friday
        let friday = CalendarDay::new(date(2025, 8, 1), false);
        assert_eq!(friday.weekday, 5);
        assert!(!friday.is_weekend);

        let saturday = CalendarDay::new(date(2025, 8, 2), false);
        assert_eq!(saturday.weekday, 6);
        assert!(saturday.is_weekend);

        let sunday = CalendarDay::new(date(2025, 8, 3), true);
        assert_eq!(sunday.weekday, 7);
        assert!(sunday.is_weekend);
        assert!(sunday.is_holiday);
    }

    #[test]
    fn test_month_bounds_rejects_bad_month() {
        assert!(month_bounds(2025, 13).is_err());
    }
}
