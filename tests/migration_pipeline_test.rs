//! End-to-end pipeline tests against in-memory legacy and roster databases.

mod common;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tokio_util::sync::CancellationToken;

use common::*;
use domain::ShiftCategory;
use sams_migrate::config::BatchSettings;
use sams_migrate::errors::AppError;
use sams_migrate::infra::repositories::entities::legacy::{shift_code, store, user};
use sams_migrate::infra::repositories::entities::target::{
    calendar_date, department, employee, holiday, location, position, roster_entry, roster_period,
    shift_base, team, team_shift_alias,
};
use sams_migrate::DataMigrator;

/// (emp_code, work_date) -> (shift base code, leave code, note)
type RosterView = BTreeMap<(String, NaiveDate), (Option<String>, Option<String>, Option<String>)>;

async fn roster_view(db: &DatabaseConnection) -> RosterView {
    let employees: HashMap<i32, String> = employee::Entity::find()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.id, e.emp_code))
        .collect();
    let bases: HashMap<i32, String> = shift_base::Entity::find()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.id, s.code))
        .collect();

    roster_entry::Entity::find()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|e| {
            (
                (employees[&e.employee_id].clone(), e.work_date),
                (
                    e.shift_base_id.map(|id| bases[&id].clone()),
                    e.leave_code,
                    e.note,
                ),
            )
        })
        .collect()
}

async fn employee_by_code(db: &DatabaseConnection, code: &str) -> employee::Model {
    employee::Entity::find()
        .filter(employee::Column::EmpCode.eq(code))
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

async fn sample() -> (DatabaseConnection, DatabaseConnection) {
    let source = legacy_db().await;
    seed_sample(&source).await;
    (source, roster_db().await)
}

#[tokio::test]
async fn test_full_run_counts() {
    let (source, target) = sample().await;

    let summary = migrator(&source, &target)
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.positions.inserted, 2);
    assert_eq!(summary.locations.inserted, 2);
    assert_eq!(summary.departments.inserted, 2);
    assert_eq!(summary.teams.inserted, 2);
    assert_eq!(summary.employees.inserted, 5);
    assert_eq!(summary.teamless_employees, 2);
    assert_eq!(summary.shift_bases.inserted, 4);
    assert_eq!(summary.shift_bases.skipped, 1);
    assert_eq!(summary.shift_categories.get(&ShiftCategory::Work), Some(&2));
    assert_eq!(summary.shift_categories.get(&ShiftCategory::Off), Some(&1));
    assert_eq!(summary.shift_categories.get(&ShiftCategory::Leave), Some(&1));
    assert_eq!(summary.aliases.inserted, 8);
    assert_eq!(summary.holidays.inserted, 1);
    assert_eq!(summary.calendar_days_inserted, 31);

    assert_eq!(summary.roster.source_rows, 8);
    assert_eq!(summary.roster.periods_created, 2);
    assert_eq!(summary.roster.inserted, 3);
    assert_eq!(summary.roster.skipped_unmapped_team, 1);
    assert_eq!(summary.roster.skipped_unmapped_employee, 1);
    assert_eq!(summary.roster.skipped_unclassified, 1);

    assert_eq!(location::Entity::find().count(&target).await.unwrap(), 2);
    assert_eq!(employee::Entity::find().count(&target).await.unwrap(), 5);
    assert_eq!(roster_entry::Entity::find().count(&target).await.unwrap(), 3);
    assert_eq!(roster_period::Entity::find().count(&target).await.unwrap(), 2);
}

#[tokio::test]
async fn test_organisation_tree_naming() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let locations: BTreeMap<String, String> = location::Entity::find()
        .all(&target)
        .await
        .unwrap()
        .into_iter()
        .map(|l| (l.code, l.name))
        .collect();
    assert_eq!(locations.get("S1").map(String::as_str), Some("Central"));
    // Blank store names fall back to the code
    assert_eq!(locations.get("S2").map(String::as_str), Some("S2"));

    let departments = department::Entity::find().all(&target).await.unwrap();
    assert!(departments.iter().all(|d| d.code == "MAIN"));
    let mut names: Vec<&str> = departments.iter().map(|d| d.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Central", "Main"]);

    let teams = team::Entity::find().all(&target).await.unwrap();
    assert_eq!(teams.len(), 2);
    assert!(teams.iter().all(|t| t.code == "DEFAULT"));
}

#[tokio::test]
async fn test_rerun_without_overwrite_is_idempotent() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();
    let before = roster_view(&target).await;

    let summary = migrator(&source, &target)
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.positions.inserted, 0);
    assert_eq!(summary.locations.inserted, 0);
    assert_eq!(summary.employees.inserted, 0);
    assert_eq!(summary.shift_bases.inserted, 0);
    assert_eq!(summary.aliases.inserted, 0);
    assert_eq!(summary.aliases.unchanged, 8);
    assert_eq!(summary.holidays.inserted, 0);
    assert_eq!(summary.calendar_days_inserted, 0);
    assert_eq!(summary.roster.periods_created, 0);
    assert_eq!(summary.roster.inserted, 0);
    assert_eq!(summary.roster.unchanged, 3);

    assert_eq!(location::Entity::find().count(&target).await.unwrap(), 2);
    assert_eq!(team_shift_alias::Entity::find().count(&target).await.unwrap(), 8);
    assert_eq!(calendar_date::Entity::find().count(&target).await.unwrap(), 31);
    assert_eq!(roster_view(&target).await, before);
}

#[tokio::test]
async fn test_overwrite_rerun_changes_nothing_when_source_is_unchanged() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let summary = migrator(&source, &target)
        .run_with_summary(true, CancellationToken::new())
        .await
        .unwrap();

    assert!(summary.overwrite);
    assert_eq!(summary.locations.updated, 0);
    assert_eq!(summary.employees.updated, 0);
    assert_eq!(summary.shift_bases.updated, 0);
    assert_eq!(summary.aliases.updated, 0);
    assert_eq!(summary.roster.updated, 0);
    assert_eq!(summary.roster.unchanged, 3);
}

#[tokio::test]
async fn test_overwrite_renames_location_in_place() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();
    let s1_location = location::Entity::find()
        .filter(location::Column::Code.eq("S1"))
        .one(&target)
        .await
        .unwrap()
        .unwrap();

    store::ActiveModel {
        id: Set(1),
        name: Set("Central Plaza".to_string()),
        ..Default::default()
    }
    .update(&source)
    .await
    .unwrap();

    // Without overwrite the stored name stays
    let summary = migrator(&source, &target)
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.locations.updated, 0);
    let kept = location::Entity::find_by_id(s1_location.id).one(&target).await.unwrap().unwrap();
    assert_eq!(kept.name, "Central");

    let summary = migrator(&source, &target)
        .run_with_summary(true, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.locations.updated, 1);
    assert_eq!(summary.departments.updated, 1);
    assert_eq!(summary.teams.updated, 1);

    let renamed = location::Entity::find_by_id(s1_location.id).one(&target).await.unwrap().unwrap();
    assert_eq!(renamed.code, "S1");
    assert_eq!(renamed.name, "Central Plaza");
    assert_eq!(location::Entity::find().count(&target).await.unwrap(), 2);
}

#[tokio::test]
async fn test_overwrite_follows_reclassified_shift_code() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let alice = employee_by_code(&target, "alice").await;
    let alice_day = roster_entry::Entity::find()
        .filter(roster_entry::Column::EmployeeId.eq(alice.id))
        .filter(roster_entry::Column::WorkDate.eq(date(2025, 8, 15)))
        .one(&target)
        .await
        .unwrap()
        .unwrap();

    // C10 becomes a leave code; alice is renamed and deactivated
    shift_code::ActiveModel {
        id: Set(2),
        is_leave: Set(true),
        ..Default::default()
    }
    .update(&source)
    .await
    .unwrap();
    user::ActiveModel {
        id: Set(1),
        full_name: Set(Some("Alice Archer".to_string())),
        status: Set(false),
        ..Default::default()
    }
    .update(&source)
    .await
    .unwrap();

    let summary = migrator(&source, &target)
        .run_with_summary(true, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.shift_bases.updated, 1);
    assert_eq!(summary.shift_categories.get(&ShiftCategory::Work), Some(&1));
    assert_eq!(summary.shift_categories.get(&ShiftCategory::Leave), Some(&2));
    assert_eq!(summary.aliases.updated, 2);
    assert_eq!(summary.employees.updated, 1);
    assert_eq!(summary.roster.updated, 1);
    assert_eq!(summary.roster.unchanged, 2);
    assert_eq!(summary.roster.inserted, 0);

    let c10 = shift_base::Entity::find()
        .filter(shift_base::Column::Code.eq("C10"))
        .one(&target)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(c10.category, "LEAVE");

    let c10_aliases = team_shift_alias::Entity::find()
        .filter(team_shift_alias::Column::AliasCode.eq("C10"))
        .all(&target)
        .await
        .unwrap();
    assert_eq!(c10_aliases.len(), 2);
    for alias in c10_aliases {
        assert_eq!(alias.shift_base_id, None);
        assert_eq!(alias.leave_code.as_deref(), Some("C10"));
    }

    // Same row, now pointing at the remaining WORK code
    let rewritten = roster_entry::Entity::find_by_id(alice_day.id)
        .one(&target)
        .await
        .unwrap()
        .unwrap();
    let c05 = shift_base::Entity::find()
        .filter(shift_base::Column::Code.eq("C05"))
        .one(&target)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rewritten.shift_base_id, Some(c05.id));
    assert_eq!(rewritten.leave_code, None);
    assert_eq!(rewritten.note.as_deref(), Some("C05,C10,OFF"));
    assert_eq!(roster_entry::Entity::find().count(&target).await.unwrap(), 3);

    let renamed = employee_by_code(&target, "alice").await;
    assert_eq!(renamed.id, alice.id);
    assert_eq!(renamed.full_name, "Alice Archer");
    assert_eq!(renamed.status, "Inactive");
    assert_eq!(renamed.team_id, alice.team_id);
    assert_eq!(renamed.position_id, alice.position_id);
}

#[tokio::test]
async fn test_reclassified_code_is_ignored_without_overwrite() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();
    let before = roster_view(&target).await;

    shift_code::ActiveModel {
        id: Set(2),
        is_leave: Set(true),
        ..Default::default()
    }
    .update(&source)
    .await
    .unwrap();

    let summary = migrator(&source, &target)
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.shift_bases.updated, 0);
    assert_eq!(summary.aliases.updated, 0);
    assert_eq!(summary.roster.updated, 0);
    assert_eq!(roster_view(&target).await, before);
}

#[tokio::test]
async fn test_roster_selects_largest_work_unit_and_keeps_codes() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let roster = roster_view(&target).await;
    assert_eq!(roster.len(), 3);

    // 0.5 + 1.0 + OFF -> the 1.0 shift, with every code in the note
    assert_eq!(
        roster.get(&("alice".to_string(), date(2025, 8, 15))),
        Some(&(Some("C10".to_string()), None, Some("C05,C10,OFF".to_string())))
    );
    // OFF and leave codes become leave codes
    assert_eq!(
        roster.get(&("bob".to_string(), date(2025, 8, 15))),
        Some(&(None, Some("OFF".to_string()), Some("OFF".to_string())))
    );
    assert_eq!(
        roster.get(&("carol".to_string(), date(2025, 8, 16))),
        Some(&(None, Some("AL".to_string()), Some("AL".to_string())))
    );
}

#[tokio::test]
async fn test_roster_periods_cover_the_month() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let periods = roster_period::Entity::find().all(&target).await.unwrap();
    assert_eq!(periods.len(), 2);
    for period in periods {
        assert_eq!(period.period_start_date, date(2025, 8, 1));
        assert_eq!(period.period_end_date, date(2025, 8, 31));
        assert_eq!(period.period_type, "Month");
        assert_eq!(period.status, "Draft");
    }
}

#[tokio::test]
async fn test_aliases_and_entries_point_at_exactly_one_target() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let aliases = team_shift_alias::Entity::find().all(&target).await.unwrap();
    assert_eq!(aliases.len(), 8);
    for alias in &aliases {
        assert!(alias.shift_base_id.is_some() != alias.leave_code.is_some());
        assert!(alias.assignment().is_ok());
    }

    let off = aliases.iter().find(|a| a.alias_code == "OFF").unwrap();
    assert_eq!(off.leave_code.as_deref(), Some("OFF"));
    let c10 = aliases.iter().find(|a| a.alias_code == "C10").unwrap();
    assert!(c10.shift_base_id.is_some());

    for entry in roster_entry::Entity::find().all(&target).await.unwrap() {
        assert!(entry.shift_base_id.is_some() != entry.leave_code.is_some());
        assert!(entry.assignment().is_ok());
    }
}

#[tokio::test]
async fn test_calendar_covers_whole_month_with_flags() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let days = calendar_date::Entity::find().all(&target).await.unwrap();
    assert_eq!(days.len(), 31);
    assert!(days.iter().all(|d| d.year == 2025 && d.month == 8));

    let by_date: HashMap<NaiveDate, calendar_date::Model> =
        days.into_iter().map(|d| (d.date, d)).collect();

    let friday = &by_date[&date(2025, 8, 15)];
    assert_eq!(friday.weekday, 5);
    assert!(!friday.is_weekend);

    let saturday = &by_date[&date(2025, 8, 16)];
    assert_eq!(saturday.weekday, 6);
    assert!(saturday.is_weekend);
    assert!(!saturday.is_holiday);

    let sunday = &by_date[&date(2025, 8, 17)];
    assert!(sunday.is_weekend);
    assert!(sunday.is_holiday);

    let holidays = holiday::Entity::find().all(&target).await.unwrap();
    assert_eq!(holidays.len(), 1);
    assert_eq!(holidays[0].name, "Independence Day");
}

#[tokio::test]
async fn test_employees_positions_and_teams() {
    let (source, target) = sample().await;
    migrator(&source, &target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let positions: HashMap<i32, String> = position::Entity::find()
        .all(&target)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.code))
        .collect();

    let alice = employee_by_code(&target, "alice").await;
    assert_eq!(positions[&alice.position_id.unwrap()], "LEAD");
    assert_eq!(alice.full_name, "Alice Able");
    assert_eq!(alice.status, "Active");
    assert_eq!(alice.hire_date, Some(date(2024, 3, 1)));
    assert!(alice.team_id.is_some());

    let bob = employee_by_code(&target, "bob").await;
    assert_eq!(positions[&bob.position_id.unwrap()], "EMP");
    assert_eq!(bob.team_id, alice.team_id);

    // Missing full name falls back to the username
    let carol = employee_by_code(&target, "carol").await;
    assert_eq!(carol.full_name, "carol");
    assert_ne!(carol.team_id, alice.team_id);

    // No store, or an unknown store, still migrates without a team
    assert_eq!(employee_by_code(&target, "dave").await.team_id, None);
    assert_eq!(employee_by_code(&target, "erin").await.team_id, None);
}

#[tokio::test]
async fn test_small_batches_produce_the_same_result() {
    let source = legacy_db().await;
    seed_sample(&source).await;

    let default_target = roster_db().await;
    migrator(&source, &default_target)
        .run(false, CancellationToken::new())
        .await
        .unwrap();

    let small_target = roster_db().await;
    let summary = migrator_with(&source, &small_target, BatchSettings::new(1, 3).unwrap())
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.roster.source_rows, 8);
    assert_eq!(summary.roster.inserted, 3);
    assert_eq!(summary.aliases.inserted, 8);
    assert_eq!(roster_view(&small_target).await, roster_view(&default_target).await);
    assert_eq!(
        calendar_date::Entity::find().count(&small_target).await.unwrap(),
        31
    );
}

#[tokio::test]
async fn test_employee_day_split_across_pages_stays_one_entry() {
    let source = legacy_db().await;
    seed_store(&source, 1, "Central").await;
    seed_user(&source, 1, "alice", None, Some(1)).await;
    seed_shift_code(&source, 1, "C05", 0.5, false).await;
    seed_shift_code(&source, 2, "C10", 1.0, false).await;
    seed_schedule(&source, 1, 1, 1, date(2025, 8, 15), &[(1, 1, 0.5), (2, 1, 0.5), (3, 2, 1.0)]).await;
    seed_schedule(&source, 2, 1, 1, date(2025, 8, 16), &[(4, 1, 0.5)]).await;

    let target = roster_db().await;
    let summary = migrator_with(&source, &target, BatchSettings::new(2, 1).unwrap())
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.roster.inserted, 2);
    let roster = roster_view(&target).await;
    assert_eq!(
        roster.get(&("alice".to_string(), date(2025, 8, 15))),
        Some(&(Some("C10".to_string()), None, Some("C05,C10".to_string())))
    );
}

#[tokio::test]
async fn test_cancelled_run_writes_nothing() {
    let (source, target) = sample().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = migrator(&source, &target).run(false, cancel).await;

    assert!(matches!(result, Err(AppError::Cancelled)));
    assert_eq!(position::Entity::find().count(&target).await.unwrap(), 0);
    assert_eq!(location::Entity::find().count(&target).await.unwrap(), 0);
    assert_eq!(roster_entry::Entity::find().count(&target).await.unwrap(), 0);
}

#[tokio::test]
async fn test_cancel_between_roster_windows_keeps_committed_days() {
    const DAYS: i32 = 400;

    let source = legacy_db().await;
    seed_store(&source, 1, "Central").await;
    seed_user(&source, 1, "alice", None, Some(1)).await;
    seed_shift_code(&source, 1, "C10", 1.0, false).await;
    let first = date(2024, 1, 1);
    for n in 0..DAYS {
        let day = first + chrono::Duration::days(n as i64);
        seed_schedule(&source, n + 1, 1, 1, day, &[(n + 1, 1, 1.0)]).await;
    }

    let target = roster_db().await;
    let cancel = CancellationToken::new();
    let run = {
        let migrator = migrator_with(&source, &target, BatchSettings::new(1, 1).unwrap());
        let cancel = cancel.clone();
        tokio::spawn(async move { migrator.run_with_summary(false, cancel).await })
    };

    // Cancel as soon as the first roster window has committed
    loop {
        if roster_entry::Entity::find().count(&target).await.unwrap() > 0 {
            cancel.cancel();
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }

    let result = run.await.unwrap();
    assert!(matches!(result, Err(AppError::Cancelled)));

    let kept = roster_entry::Entity::find().count(&target).await.unwrap();
    assert!(kept > 0);
    assert!(kept < DAYS as u64);
    assert!(roster_period::Entity::find().count(&target).await.unwrap() >= 1);

    // A fresh run picks up the remaining days
    let summary = migrator(&source, &target)
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(summary.roster.unchanged, kept);
    assert_eq!(summary.roster.inserted, DAYS as u64 - kept);
    assert_eq!(
        roster_entry::Entity::find().count(&target).await.unwrap(),
        DAYS as u64
    );
}

#[tokio::test]
async fn test_empty_source_migrates_positions_only() {
    let source = legacy_db().await;
    let target = roster_db().await;

    let summary = migrator(&source, &target)
        .run_with_summary(false, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.positions.inserted, 2);
    assert_eq!(summary.locations.resolved(), 0);
    assert_eq!(summary.calendar_days_inserted, 0);
    assert_eq!(summary.roster.source_rows, 0);
    assert_eq!(calendar_date::Entity::find().count(&target).await.unwrap(), 0);
}
