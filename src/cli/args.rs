//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Migrates scheduling data from the legacy schema into the roster schema
#[derive(Parser, Debug)]
#[command(name = "sams-migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the target (roster) schema
    Schema(SchemaArgs),

    /// Copy legacy data into the roster schema
    Run(RunArgs),
}

/// Arguments for the schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

/// Schema actions
#[derive(Subcommand, Debug)]
pub enum SchemaAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all roster tables and re-run every migration
    Fresh,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Update rows that already exist in the target
    #[arg(long)]
    pub overwrite: bool,

    /// Source rows read per page (overrides MIGRATION_BATCH_SIZE)
    #[arg(long)]
    pub batch_size: Option<u64>,

    /// Rows per write statement, at most 3000 (overrides MIGRATION_WRITE_CHUNK_SIZE)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}
