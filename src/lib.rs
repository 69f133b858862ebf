//! sams-migrate - Legacy scheduling data -> roster schema migration
//!
//! Copies and re-normalizes stores, users, shift codes, holidays and shift
//! schedules from the legacy ("main") schema into the roster schema:
//! locations, departments, teams, employees, shift bases, team aliases, a
//! calendar dimension and one canonical roster entry per employee-day.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Configuration and batching defaults
//! - **services**: The migration pipeline and its phases
//! - **infra**: Connections, schema migrations, entities, batched reads
//! - **errors**: Centralized error handling
//!
//! Pure roster rules live in the `domain` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Create or upgrade the roster schema
//! sams-migrate schema up
//!
//! # Migrate, updating rows that already exist
//! sams-migrate run --overwrite --batch-size 1000
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use config::{BatchSettings, Config};
pub use errors::{AppError, AppResult};
pub use services::{DataMigrator, MigrationSummary, SamsMigrator};
