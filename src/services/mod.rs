//! Application services layer - the migration pipeline.
//!
//! Phases run strictly in dependency order; each one consumes only the
//! in-memory maps produced by the phases before it:
//!
//! 1. reference: positions, locations, departments, teams
//! 2. employees
//! 3. vocabulary: shift bases
//! 4. aliases: team x code cross product
//! 5. holidays and calendar
//! 6. roster: periods and canonical entries

mod aliases;
mod calendar;
mod context;
mod employees;
mod holidays;
mod migrator;
mod reference;
mod roster;
mod stats;
mod vocabulary;

pub use migrator::{DataMigrator, SamsMigrator};
pub use stats::{MigrationSummary, PhaseStats, RosterStats};

#[cfg(any(test, feature = "test-utils"))]
pub use migrator::MockDataMigrator;
