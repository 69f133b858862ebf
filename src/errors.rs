//! Centralized error handling.
//!
//! Provides a unified error type for the migration pipeline. Row-level
//! anomalies never surface here; they are counted and logged by the phases.

use thiserror::Error;

use domain::DomainError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Store / transport failures (fatal to the run)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Broken domain invariant detected while decoding or building rows
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    // Classification bug: the pipeline produced something it must never produce
    #[error("Invariant violated: {0}")]
    Invariant(String),

    // Cooperative cancellation observed at a batch boundary
    #[error("Migration cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get a stable error code for logs and exit summaries
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Domain(_) => "DOMAIN_ERROR",
            AppError::Invariant(_) => "INVARIANT_VIOLATION",
            AppError::Cancelled => "CANCELLED",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether re-running the migration can be expected to make progress
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Cancelled)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        AppError::Invariant(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
