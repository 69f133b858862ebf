//! Domain-level errors.
//!
//! These errors represent broken domain invariants. They are independent of
//! infrastructure concerns (database, CLI).

use thiserror::Error;

/// Domain-specific errors for invariant violations and malformed values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A shift/leave assignment has both or neither side set
    #[error("Invalid shift assignment: {0}")]
    InvalidAssignment(String),

    /// Unrecognised shift category text
    #[error("Unknown shift category: {0}")]
    UnknownCategory(String),

    /// A calendar value could not be constructed
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl DomainError {
    /// Create an invalid assignment error
    pub fn invalid_assignment(msg: impl Into<String>) -> Self {
        DomainError::InvalidAssignment(msg.into())
    }

    /// Create an invalid date error
    pub fn invalid_date(msg: impl Into<String>) -> Self {
        DomainError::InvalidDate(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
