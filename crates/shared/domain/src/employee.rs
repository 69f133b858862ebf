//! Employee classification rules.

use crate::constants::{
    LEAD_ROLE_MARKERS, POSITION_EMP, POSITION_EMP_NAME, POSITION_LEAD, POSITION_LEAD_NAME,
    STATUS_ACTIVE, STATUS_INACTIVE,
};

/// Fixed position vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionCode {
    Emp,
    Lead,
}

impl PositionCode {
    /// All positions that must exist before employees are classified
    pub const ALL: [PositionCode; 2] = [PositionCode::Emp, PositionCode::Lead];

    pub fn code(&self) -> &'static str {
        match self {
            PositionCode::Emp => POSITION_EMP,
            PositionCode::Lead => POSITION_LEAD,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PositionCode::Emp => POSITION_EMP_NAME,
            PositionCode::Lead => POSITION_LEAD_NAME,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            POSITION_EMP => Some(PositionCode::Emp),
            POSITION_LEAD => Some(PositionCode::Lead),
            _ => None,
        }
    }
}

/// Infer the position from free-text role names.
///
/// Any role containing "lead", "leader" or "manager" (case-insensitive) makes
/// the employee a LEAD.
pub fn infer_position<S: AsRef<str>>(role_tags: &[S]) -> PositionCode {
    let is_lead = role_tags.iter().any(|tag| {
        let tag = tag.as_ref().to_lowercase();
        LEAD_ROLE_MARKERS.iter().any(|marker| tag.contains(marker))
    });

    if is_lead {
        PositionCode::Lead
    } else {
        PositionCode::Emp
    }
}

/// Status string stored on the employee row
pub fn status_label(active: bool) -> &'static str {
    if active {
        STATUS_ACTIVE
    } else {
        STATUS_INACTIVE
    }
}
