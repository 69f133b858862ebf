//! Roster rules: collapsing one employee-day of raw shift details into a
//! single canonical entry, and the monthly period key.

use chrono::{Datelike, NaiveDate};

use crate::calendar::month_bounds;
use crate::constants::NOTE_CODE_SEPARATOR;
use crate::error::DomainResult;
use crate::shift::ShiftCategory;

/// One raw shift-detail row after its code has been looked up in the vocabulary
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedDetail {
    pub code: String,
    pub category: ShiftCategory,
    pub work_unit: f64,
}

impl ClassifiedDetail {
    pub fn new(code: impl Into<String>, category: ShiftCategory, work_unit: f64) -> Self {
        Self {
            code: code.into(),
            category,
            work_unit,
        }
    }
}

/// Pick the canonical detail of an employee-day.
///
/// WORK beats OFF beats LEAVE. Among WORK rows the largest work unit wins and
/// ties keep the first row seen; among OFF or LEAVE rows the first row wins.
/// Returns `None` for an empty group.
pub fn select_canonical(details: &[ClassifiedDetail]) -> Option<&ClassifiedDetail> {
    let mut best_work: Option<&ClassifiedDetail> = None;
    for detail in details.iter().filter(|d| d.category == ShiftCategory::Work) {
        match best_work {
            Some(current) if detail.work_unit <= current.work_unit => {}
            _ => best_work = Some(detail),
        }
    }

    best_work
        .or_else(|| details.iter().find(|d| d.category == ShiftCategory::Off))
        .or_else(|| details.iter().find(|d| d.category == ShiftCategory::Leave))
}

/// Join the distinct, non-blank codes of a group in encounter order.
pub fn compose_note<'a, I>(codes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<&str> = Vec::new();
    for code in codes.into_iter().map(str::trim) {
        if !code.is_empty() && !seen.contains(&code) {
            seen.push(code);
        }
    }
    seen.join(NOTE_CODE_SEPARATOR)
}

/// Natural key of a monthly roster period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    pub team_id: i32,
    pub year: i32,
    pub month: u32,
}

impl PeriodKey {
    /// Key of the period that contains `day` for `team_id`
    pub fn for_day(team_id: i32, day: NaiveDate) -> Self {
        Self {
            team_id,
            year: day.year(),
            month: day.month(),
        }
    }

    /// First and last day of the period
    pub fn bounds(&self) -> DomainResult<(NaiveDate, NaiveDate)> {
        month_bounds(self.year, self.month)
    }
}
