//! Run command - Legacy -> roster data migration.

use tokio_util::sync::CancellationToken;

use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::services::{DataMigrator, MigrationSummary, SamsMigrator};

/// Execute the run command
pub async fn execute(args: RunArgs, config: Config) -> AppResult<()> {
    let batch = config.batch.with_overrides(args.batch_size, args.chunk_size)?;

    let source = Database::connect(&config.source_database_url)
        .await
        .map_err(|e| AppError::internal(format!("Source database connection failed: {}", e)))?;
    source.ping().await?;

    let target = Database::connect_and_migrate(&config.target_database_url)
        .await
        .map_err(|e| AppError::internal(format!("Target database setup failed: {}", e)))?;

    let migrator = SamsMigrator::new(
        source.get_connection(),
        Persistence::new(target.get_connection()),
        batch,
    );

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let result = run_migration(&migrator, args.overwrite, cancel).await;
    watcher.abort();

    let summary = result?;
    println!("{}", render_summary(&summary, args.json)?);
    Ok(())
}

/// Cancel `token` on the first Ctrl+C
async fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if signal.is_ok() {
                tracing::warn!("Received shutdown signal, stopping after the current batch...");
                token.cancel();
            }
        }
        _ = token.cancelled() => {}
    }
}

/// Drive a migrator, logging how the run ended
pub async fn run_migration<M>(
    migrator: &M,
    overwrite: bool,
    cancel: CancellationToken,
) -> AppResult<MigrationSummary>
where
    M: DataMigrator + ?Sized,
{
    match migrator.run_with_summary(overwrite, cancel).await {
        Ok(summary) => Ok(summary),
        Err(AppError::Cancelled) => {
            tracing::warn!("Migration cancelled; committed batches are kept, re-run to resume");
            Err(AppError::Cancelled)
        }
        Err(e) => {
            tracing::error!(code = e.code(), "Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Human-readable or JSON rendering of a run summary
pub fn render_summary(summary: &MigrationSummary, json: bool) -> AppResult<String> {
    if json {
        return serde_json::to_string_pretty(summary)
            .map_err(|e| AppError::internal(format!("Failed to serialize summary: {}", e)));
    }

    let phases = [
        ("positions", summary.positions),
        ("locations", summary.locations),
        ("departments", summary.departments),
        ("teams", summary.teams),
        ("employees", summary.employees),
        ("shift bases", summary.shift_bases),
        ("aliases", summary.aliases),
        ("holidays", summary.holidays),
    ];

    let mut lines = Vec::new();
    for (name, stats) in phases {
        lines.push(format!(
            "{:<12} inserted={} updated={} unchanged={} skipped={}",
            name, stats.inserted, stats.updated, stats.unchanged, stats.skipped
        ));
    }
    lines.push(format!("{:<12} {}", "teamless", summary.teamless_employees));
    lines.push(format!("{:<12} inserted={}", "calendar", summary.calendar_days_inserted));

    let roster = &summary.roster;
    lines.push(format!(
        "{:<12} rows={} periods={} inserted={} updated={} unchanged={} skipped={}",
        "roster",
        roster.source_rows,
        roster.periods_created,
        roster.inserted,
        roster.updated,
        roster.unchanged,
        roster.skipped()
    ));

    Ok(lines.join("\n"))
}
