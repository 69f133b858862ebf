//! Shift vocabulary: categories and the shift-or-leave assignment type.

use serde::{Deserialize, Serialize};

use crate::constants::{CATEGORY_LEAVE, CATEGORY_OFF, CATEGORY_WORK};
use crate::error::{DomainError, DomainResult};

/// Classification of a shift code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShiftCategory {
    Work,
    Off,
    Leave,
}

impl ShiftCategory {
    /// Classify a legacy shift code.
    ///
    /// Leave flags win over the work unit; a zero work unit on a non-leave
    /// code means a day off.
    pub fn classify(is_leave: bool, work_unit: f64) -> Self {
        if is_leave {
            ShiftCategory::Leave
        } else if work_unit == 0.0 {
            ShiftCategory::Off
        } else {
            ShiftCategory::Work
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftCategory::Work => CATEGORY_WORK,
            ShiftCategory::Off => CATEGORY_OFF,
            ShiftCategory::Leave => CATEGORY_LEAVE,
        }
    }

    /// OFF and LEAVE codes are stored as leave codes rather than shift bases
    pub fn is_leave_like(&self) -> bool {
        !matches!(self, ShiftCategory::Work)
    }
}

impl std::str::FromStr for ShiftCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CATEGORY_WORK => Ok(ShiftCategory::Work),
            CATEGORY_OFF => Ok(ShiftCategory::Off),
            CATEGORY_LEAVE => Ok(ShiftCategory::Leave),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved shift-vocabulary entry: target shift base plus its category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub shift_base_id: i32,
    pub category: ShiftCategory,
}

impl VocabularyEntry {
    pub fn new(shift_base_id: i32, category: ShiftCategory) -> Self {
        Self {
            shift_base_id,
            category,
        }
    }

    /// Assignment an alias or roster entry gets when it points at `code`
    pub fn assignment(&self, code: &str) -> ShiftAssignment {
        if self.category.is_leave_like() {
            ShiftAssignment::Leave(code.to_string())
        } else {
            ShiftAssignment::Shift(self.shift_base_id)
        }
    }
}

/// What an alias or roster entry points at: exactly one of a shift base or a
/// leave code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShiftAssignment {
    Shift(i32),
    Leave(String),
}

impl ShiftAssignment {
    /// Rebuild an assignment from its two nullable storage columns.
    pub fn from_columns(shift_base_id: Option<i32>, leave_code: Option<String>) -> DomainResult<Self> {
        match (shift_base_id, leave_code) {
            (Some(id), None) => Ok(ShiftAssignment::Shift(id)),
            (None, Some(code)) if !code.trim().is_empty() => Ok(ShiftAssignment::Leave(code)),
            (Some(id), Some(code)) => Err(DomainError::invalid_assignment(format!(
                "both shift base {} and leave code {} are set",
                id, code
            ))),
            _ => Err(DomainError::invalid_assignment(
                "neither shift base nor leave code is set",
            )),
        }
    }

    /// Split into `(shift_base_id, leave_code)` storage columns
    pub fn into_columns(self) -> (Option<i32>, Option<String>) {
        match self {
            ShiftAssignment::Shift(id) => (Some(id), None),
            ShiftAssignment::Leave(code) => (None, Some(code)),
        }
    }
}
