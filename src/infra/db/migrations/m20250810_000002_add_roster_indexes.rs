//! Migration: Add lookup indexes used by roster reporting and re-runs.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_employees_team_id")
                    .table(Employees::Table)
                    .col(Employees::TeamId)
                    .to_owned(),
            )
            .await?;

        // Per-employee timelines across periods
        manager
            .create_index(
                Index::create()
                    .name("idx_roster_entries_employee_date")
                    .table(RosterEntries::Table)
                    .col(RosterEntries::EmployeeId)
                    .col(RosterEntries::WorkDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roster_entries_work_date")
                    .table(RosterEntries::Table)
                    .col(RosterEntries::WorkDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_calendar_dates_year_month")
                    .table(CalendarDates::Table)
                    .col(CalendarDates::Year)
                    .col(CalendarDates::Month)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_calendar_dates_year_month")
                    .table(CalendarDates::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_roster_entries_work_date")
                    .table(RosterEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_roster_entries_employee_date")
                    .table(RosterEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_employees_team_id")
                    .table(Employees::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Employees {
    Table,
    TeamId,
}

#[derive(Iden)]
enum RosterEntries {
    Table,
    EmployeeId,
    WorkDate,
}

#[derive(Iden)]
enum CalendarDates {
    Table,
    Year,
    Month,
}
