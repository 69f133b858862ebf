//! Shared fixtures: in-memory legacy and roster databases.

#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema, Set,
};
use sea_orm_migration::MigratorTrait;

use sams_migrate::config::BatchSettings;
use sams_migrate::infra::repositories::entities::legacy::{
    holiday, role, shift_code, shift_schedule, shift_schedule_detail, store, user, user_role,
};
use sams_migrate::infra::{Migrator, Persistence};
use sams_migrate::SamsMigrator;

pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(options).await.unwrap()
}

/// Empty legacy schema
pub async fn legacy_db() -> DatabaseConnection {
    let db = memory_db().await;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents before children
    let statements = [
        schema.create_table_from_entity(store::Entity),
        schema.create_table_from_entity(role::Entity),
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(user_role::Entity),
        schema.create_table_from_entity(shift_code::Entity),
        schema.create_table_from_entity(shift_schedule::Entity),
        schema.create_table_from_entity(shift_schedule_detail::Entity),
        schema.create_table_from_entity(holiday::Entity),
    ];
    for statement in &statements {
        db.execute(backend.build(statement)).await.unwrap();
    }
    db
}

/// Roster schema with every migration applied
pub async fn roster_db() -> DatabaseConnection {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn migrator(source: &DatabaseConnection, target: &DatabaseConnection) -> SamsMigrator {
    migrator_with(source, target, BatchSettings::default())
}

pub fn migrator_with(
    source: &DatabaseConnection,
    target: &DatabaseConnection,
    batch: BatchSettings,
) -> SamsMigrator {
    SamsMigrator::new(source.clone(), Persistence::new(target.clone()), batch)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Legacy seeding
// =============================================================================

pub async fn seed_store(db: &DatabaseConnection, id: i32, name: &str) {
    store::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        address: Set(None),
        phone: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_role(db: &DatabaseConnection, id: i32, name: &str) {
    role::ActiveModel {
        id: Set(id),
        role_name: Set(name.to_string()),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_user(
    db: &DatabaseConnection,
    id: i32,
    username: &str,
    full_name: Option<&str>,
    store_id: Option<i32>,
) {
    user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        full_name: Set(full_name.map(str::to_string)),
        phone_number: Set(None),
        store_id: Set(store_id),
        status: Set(true),
        created_at: Set(date(2024, 3, 1).and_hms_opt(9, 0, 0).unwrap()),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_user_role(db: &DatabaseConnection, id: i32, user_id: i32, role_id: i32) {
    user_role::ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        role_id: Set(role_id),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_shift_code(db: &DatabaseConnection, id: i32, code: &str, work_unit: f64, is_leave: bool) {
    shift_code::ActiveModel {
        id: Set(id),
        code: Set(code.to_string()),
        description: Set(None),
        work_unit: Set(work_unit),
        is_leave: Set(is_leave),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn seed_holiday(db: &DatabaseConnection, id: i32, day: NaiveDate, description: &str) {
    holiday::ActiveModel {
        id: Set(id),
        date: Set(day),
        description: Set(Some(description.to_string())),
    }
    .insert(db)
    .await
    .unwrap();
}

/// One schedule header with `(detail_id, shift_code_id, work_unit)` details
pub async fn seed_schedule(
    db: &DatabaseConnection,
    id: i32,
    user_id: i32,
    store_id: i32,
    day: NaiveDate,
    details: &[(i32, i32, f64)],
) {
    shift_schedule::ActiveModel {
        id: Set(id),
        employee_id: Set(user_id),
        store_id: Set(store_id),
        date: Set(day),
    }
    .insert(db)
    .await
    .unwrap();

    for (detail_id, shift_code_id, work_unit) in details {
        shift_schedule_detail::ActiveModel {
            id: Set(*detail_id),
            schedule_id: Set(id),
            shift_code_id: Set(*shift_code_id),
            work_unit: Set(*work_unit),
        }
        .insert(db)
        .await
        .unwrap();
    }
}

/// A small legacy dataset covering every phase.
///
/// - stores 1 "Central" and 2 (blank name)
/// - alice (manager) and bob at store 1, carol at store 2
/// - dave without a store, erin at the unknown store 99
/// - codes C05 (0.5), C10 (1.0), OFF (0), AL (leave) and one blank code
/// - 2025-08-17 is a holiday
/// - schedules between 2025-08-15 and 2025-08-21, including one for an
///   unknown store, one for an unknown user and one with only the blank code
pub async fn seed_sample(db: &DatabaseConnection) {
    seed_store(db, 1, "Central").await;
    seed_store(db, 2, "   ").await;

    seed_role(db, 1, "Store Manager").await;
    seed_role(db, 2, "Cashier").await;

    seed_user(db, 1, "alice", Some("Alice Able"), Some(1)).await;
    seed_user(db, 2, "bob", Some("Bob Baker"), Some(1)).await;
    seed_user(db, 3, "carol", None, Some(2)).await;
    seed_user(db, 4, "dave", Some("Dave Dunn"), None).await;
    seed_user(db, 5, "erin", Some("Erin Eck"), Some(99)).await;

    seed_user_role(db, 1, 1, 1).await;
    seed_user_role(db, 2, 2, 2).await;

    seed_shift_code(db, 1, "C05", 0.5, false).await;
    seed_shift_code(db, 2, "C10", 1.0, false).await;
    seed_shift_code(db, 3, "OFF", 0.0, false).await;
    seed_shift_code(db, 4, "AL", 0.0, true).await;
    seed_shift_code(db, 5, "  ", 0.0, false).await;

    seed_holiday(db, 1, date(2025, 8, 17), "Independence Day").await;

    seed_schedule(db, 1, 1, 1, date(2025, 8, 15), &[(1, 1, 0.5), (2, 2, 1.0), (3, 3, 0.0)]).await;
    seed_schedule(db, 2, 2, 1, date(2025, 8, 15), &[(4, 3, 0.0)]).await;
    seed_schedule(db, 3, 3, 2, date(2025, 8, 16), &[(5, 4, 0.0)]).await;
    seed_schedule(db, 4, 5, 99, date(2025, 8, 16), &[(6, 2, 1.0)]).await;
    seed_schedule(db, 5, 42, 1, date(2025, 8, 20), &[(7, 2, 1.0)]).await;
    seed_schedule(db, 6, 2, 1, date(2025, 8, 21), &[(8, 5, 0.0)]).await;
}
