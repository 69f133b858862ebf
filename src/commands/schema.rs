//! Schema command - Target schema migration management.

use crate::cli::args::{SchemaAction, SchemaArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the schema command
pub async fn execute(args: SchemaArgs, config: Config) -> AppResult<()> {
    tracing::info!("Running schema command...");

    let db = Database::connect(&config.target_database_url)
        .await
        .map_err(|e| AppError::internal(format!("Target database connection failed: {}", e)))?;

    match args.action {
        SchemaAction::Up => {
            tracing::info!("Running pending migrations...");
            db.run_migrations().await?;
            tracing::info!("Migrations completed successfully");
        }
        SchemaAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.rollback_migration().await?;
            tracing::info!("Rollback completed successfully");
        }
        SchemaAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let status_str = if applied { "applied" } else { "pending" };
                println!("{}: {}", name, status_str);
            }
        }
        SchemaAction::Fresh => {
            tracing::warn!("Dropping roster tables and running all migrations...");
            db.fresh_migrations().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}
