//! Migration: Create the roster schema tables and their natural-key indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Organisation tree
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Locations::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Locations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Locations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::LocationId).integer().not_null())
                    .col(ColumnDef::new(Departments::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Departments::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Departments::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_departments_location")
                            .from(Departments::Table, Departments::LocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teams::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Teams::DepartmentId).integer().not_null())
                    .col(ColumnDef::new(Teams::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Teams::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Teams::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_department")
                            .from(Teams::Table, Teams::DepartmentId)
                            .to(Departments::Table, Departments::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Positions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Positions::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Positions::Name).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::EmpCode).string_len(64).not_null())
                    .col(ColumnDef::new(Employees::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Employees::TeamId).integer().null())
                    .col(ColumnDef::new(Employees::PositionId).integer().null())
                    .col(ColumnDef::new(Employees::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Employees::Phone).string_len(32).null())
                    .col(ColumnDef::new(Employees::HireDate).date().null())
                    .col(ColumnDef::new(Employees::Attributes).text().null())
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_team")
                            .from(Employees::Table, Employees::TeamId)
                            .to(Teams::Table, Teams::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employees_position")
                            .from(Employees::Table, Employees::PositionId)
                            .to(Positions::Table, Positions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Shift vocabulary
        manager
            .create_table(
                Table::create()
                    .table(ShiftBases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShiftBases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShiftBases::Code).string_len(32).not_null())
                    .col(ColumnDef::new(ShiftBases::Name).string_len(255).null())
                    .col(ColumnDef::new(ShiftBases::StartTime).time().null())
                    .col(ColumnDef::new(ShiftBases::EndTime).time().null())
                    .col(
                        ColumnDef::new(ShiftBases::BreakMinutes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ShiftBases::IsOvernight)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ShiftBases::Category).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeamShiftAliases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamShiftAliases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamShiftAliases::TeamId).integer().not_null())
                    .col(ColumnDef::new(TeamShiftAliases::ShiftBaseId).integer().null())
                    .col(ColumnDef::new(TeamShiftAliases::LeaveCode).string_len(32).null())
                    .col(
                        ColumnDef::new(TeamShiftAliases::AliasCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_shift_aliases_team")
                            .from(TeamShiftAliases::Table, TeamShiftAliases::TeamId)
                            .to(Teams::Table, Teams::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_shift_aliases_shift_base")
                            .from(TeamShiftAliases::Table, TeamShiftAliases::ShiftBaseId)
                            .to(ShiftBases::Table, ShiftBases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Calendar
        manager
            .create_table(
                Table::create()
                    .table(Holidays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Holidays::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Holidays::Date).date().not_null())
                    .col(ColumnDef::new(Holidays::Name).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CalendarDates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CalendarDates::Date)
                            .date()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CalendarDates::Year).integer().not_null())
                    .col(ColumnDef::new(CalendarDates::Month).integer().not_null())
                    .col(ColumnDef::new(CalendarDates::Day).integer().not_null())
                    .col(ColumnDef::new(CalendarDates::Weekday).integer().not_null())
                    .col(ColumnDef::new(CalendarDates::IsWeekend).boolean().not_null())
                    .col(
                        ColumnDef::new(CalendarDates::IsHoliday)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Roster
        manager
            .create_table(
                Table::create()
                    .table(RosterPeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RosterPeriods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RosterPeriods::TeamId).integer().not_null())
                    .col(ColumnDef::new(RosterPeriods::PeriodStartDate).date().not_null())
                    .col(ColumnDef::new(RosterPeriods::PeriodEndDate).date().not_null())
                    .col(ColumnDef::new(RosterPeriods::PeriodType).string_len(16).not_null())
                    .col(ColumnDef::new(RosterPeriods::Status).string_len(16).not_null())
                    .col(ColumnDef::new(RosterPeriods::CreatedBy).string_len(64).null())
                    .col(
                        ColumnDef::new(RosterPeriods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_periods_team")
                            .from(RosterPeriods::Table, RosterPeriods::TeamId)
                            .to(Teams::Table, Teams::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RosterEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RosterEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RosterEntries::RosterPeriodId).integer().not_null())
                    .col(ColumnDef::new(RosterEntries::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(RosterEntries::WorkDate).date().not_null())
                    .col(ColumnDef::new(RosterEntries::ShiftBaseId).integer().null())
                    .col(ColumnDef::new(RosterEntries::LeaveCode).string_len(32).null())
                    .col(ColumnDef::new(RosterEntries::StartTimeOverride).time().null())
                    .col(ColumnDef::new(RosterEntries::EndTimeOverride).time().null())
                    .col(ColumnDef::new(RosterEntries::Note).text().null())
                    .col(ColumnDef::new(RosterEntries::Attributes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_entries_period")
                            .from(RosterEntries::Table, RosterEntries::RosterPeriodId)
                            .to(RosterPeriods::Table, RosterPeriods::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_entries_employee")
                            .from(RosterEntries::Table, RosterEntries::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_roster_entries_shift_base")
                            .from(RosterEntries::Table, RosterEntries::ShiftBaseId)
                            .to(ShiftBases::Table, ShiftBases::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural keys
        for index in natural_key_indexes() {
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents
        manager
            .drop_table(Table::drop().table(RosterEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RosterPeriods::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CalendarDates::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Holidays::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamShiftAliases::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShiftBases::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

fn natural_key_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("ux_locations_code")
            .table(Locations::Table)
            .col(Locations::Code)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_departments_location_code")
            .table(Departments::Table)
            .col(Departments::LocationId)
            .col(Departments::Code)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_teams_department_code")
            .table(Teams::Table)
            .col(Teams::DepartmentId)
            .col(Teams::Code)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_positions_code")
            .table(Positions::Table)
            .col(Positions::Code)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_employees_emp_code")
            .table(Employees::Table)
            .col(Employees::EmpCode)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_shift_bases_code")
            .table(ShiftBases::Table)
            .col(ShiftBases::Code)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_team_shift_aliases_team_alias")
            .table(TeamShiftAliases::Table)
            .col(TeamShiftAliases::TeamId)
            .col(TeamShiftAliases::AliasCode)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_holidays_date")
            .table(Holidays::Table)
            .col(Holidays::Date)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_roster_periods_team_start")
            .table(RosterPeriods::Table)
            .col(RosterPeriods::TeamId)
            .col(RosterPeriods::PeriodStartDate)
            .unique()
            .to_owned(),
        Index::create()
            .name("ux_roster_entries_period_employee_date")
            .table(RosterEntries::Table)
            .col(RosterEntries::RosterPeriodId)
            .col(RosterEntries::EmployeeId)
            .col(RosterEntries::WorkDate)
            .unique()
            .to_owned(),
    ]
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
    Code,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    LocationId,
    Code,
    Name,
    IsActive,
}

#[derive(Iden)]
enum Teams {
    Table,
    Id,
    DepartmentId,
    Code,
    Name,
    IsActive,
}

#[derive(Iden)]
enum Positions {
    Table,
    Id,
    Code,
    Name,
}

#[derive(Iden)]
enum Employees {
    Table,
    Id,
    EmpCode,
    FullName,
    TeamId,
    PositionId,
    Status,
    Phone,
    HireDate,
    Attributes,
    CreatedAt,
}

#[derive(Iden)]
enum ShiftBases {
    Table,
    Id,
    Code,
    Name,
    StartTime,
    EndTime,
    BreakMinutes,
    IsOvernight,
    Category,
}

#[derive(Iden)]
enum TeamShiftAliases {
    Table,
    Id,
    TeamId,
    ShiftBaseId,
    LeaveCode,
    AliasCode,
}

#[derive(Iden)]
enum Holidays {
    Table,
    Id,
    Date,
    Name,
}

#[derive(Iden)]
enum CalendarDates {
    Table,
    Date,
    Year,
    Month,
    Day,
    Weekday,
    IsWeekend,
    IsHoliday,
}

#[derive(Iden)]
enum RosterPeriods {
    Table,
    Id,
    TeamId,
    PeriodStartDate,
    PeriodEndDate,
    PeriodType,
    Status,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum RosterEntries {
    Table,
    Id,
    RosterPeriodId,
    EmployeeId,
    WorkDate,
    ShiftBaseId,
    LeaveCode,
    StartTimeOverride,
    EndTimeOverride,
    Note,
    Attributes,
}
