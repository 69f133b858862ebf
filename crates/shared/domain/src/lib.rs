//! Domain layer - Roster rules and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! shift classification, canonical roster selection, calendar math and the
//! natural keys shared by the migration phases.

pub mod calendar;
pub mod constants;
pub mod employee;
pub mod error;
pub mod roster;
pub mod shift;

pub use calendar::{days_inclusive, expand_to_months, month_bounds, CalendarDay};
pub use constants::*;
pub use employee::{infer_position, status_label, PositionCode};
pub use error::{DomainError, DomainResult};
pub use roster::{compose_note, select_canonical, ClassifiedDetail, PeriodKey};
pub use shift::{ShiftAssignment, ShiftCategory, VocabularyEntry};

/// Natural key of the location derived from a legacy store
pub fn location_code(store_id: i32) -> String {
    format!("{}{}", LOCATION_CODE_PREFIX, store_id)
}

/// Trim an optional legacy text value, treating blank as missing
pub fn clean_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
