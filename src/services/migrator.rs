//! Pipeline orchestration: runs every phase in dependency order.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::context::RunContext;
use super::roster::RosterLookups;
use super::stats::MigrationSummary;
use super::{aliases, calendar, employees, holidays, reference, roster, vocabulary};
use crate::config::BatchSettings;
use crate::errors::AppResult;
use crate::infra::Persistence;

/// Trigger contract of the legacy -> roster migration.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DataMigrator: Send + Sync {
    /// Run every phase and return what each of them did.
    ///
    /// With `overwrite` unset, rows that already exist in the target are
    /// left untouched. Cancellation is observed at batch boundaries and
    /// surfaces as `AppError::Cancelled`; batches committed before that stay.
    async fn run_with_summary(
        &self,
        overwrite: bool,
        cancel: CancellationToken,
    ) -> AppResult<MigrationSummary>;

    /// Run every phase; counts are only logged.
    async fn run(&self, overwrite: bool, cancel: CancellationToken) -> AppResult<()> {
        self.run_with_summary(overwrite, cancel).await.map(|_| ())
    }
}

/// Migrates the legacy schema into the roster schema
pub struct SamsMigrator {
    source: DatabaseConnection,
    target: Persistence,
    batch: BatchSettings,
}

impl SamsMigrator {
    pub fn new(source: DatabaseConnection, target: Persistence, batch: BatchSettings) -> Self {
        Self {
            source,
            target,
            batch,
        }
    }
}

#[async_trait]
impl DataMigrator for SamsMigrator {
    async fn run_with_summary(
        &self,
        overwrite: bool,
        cancel: CancellationToken,
    ) -> AppResult<MigrationSummary> {
        let ctx = RunContext {
            source: &self.source,
            target: &self.target,
            batch: self.batch,
            overwrite,
            cancel: &cancel,
        };
        let mut summary = MigrationSummary {
            overwrite,
            ..Default::default()
        };

        tracing::info!(
            overwrite,
            batch_size = self.batch.batch_size,
            write_chunk_size = self.batch.write_chunk_size,
            "Starting migration"
        );

        // Organisation tree
        ctx.check_cancelled()?;
        let (positions, stats) = reference::ensure_positions(&ctx).await?;
        summary.positions = stats;

        let (locations, stats) = reference::migrate_locations(&ctx).await?;
        summary.locations = stats;

        let (departments, stats) = reference::migrate_departments(&ctx, &locations).await?;
        summary.departments = stats;

        let (store_to_team, stats) = reference::migrate_teams(&ctx, &departments).await?;
        summary.teams = stats;

        // People
        let outcome = employees::migrate_employees(&ctx, &store_to_team, &positions).await?;
        summary.employees = outcome.stats;
        summary.teamless_employees = outcome.teamless;

        // Shift vocabulary and per-team aliases
        let (vocab, stats) = vocabulary::migrate_shift_bases(&ctx).await?;
        summary.shift_bases = stats;
        summary.shift_categories = vocabulary::category_counts(&vocab);

        let mut team_ids: Vec<i32> = store_to_team.values().copied().collect();
        team_ids.sort_unstable();
        team_ids.dedup();
        summary.aliases = aliases::materialize_aliases(&ctx, &team_ids, &vocab).await?;

        // Calendar
        let (holiday_dates, stats) = holidays::migrate_holidays(&ctx).await?;
        summary.holidays = stats;
        summary.calendar_days_inserted = calendar::generate_calendar(&ctx, &holiday_dates).await?;

        // Roster
        let lookups = RosterLookups {
            store_to_team: &store_to_team,
            user_to_employee: &outcome.user_to_employee,
            vocabulary: &vocab,
        };
        summary.roster = roster::migrate_roster(&ctx, &lookups).await?;

        tracing::info!(
            employees = outcome.user_to_employee.len(),
            teamless = summary.teamless_employees,
            roster_inserted = summary.roster.inserted,
            roster_skipped = summary.roster.skipped(),
            "Migration completed"
        );
        Ok(summary)
    }
}
