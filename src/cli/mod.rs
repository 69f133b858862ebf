//! CLI module - Command-line interface for the migrator.
//!
//! Provides commands for:
//! - `schema` - Target schema migrations
//! - `run` - Legacy -> roster data migration

pub mod args;

pub use args::{Cli, Commands};
