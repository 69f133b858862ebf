//! Reference resolvers: positions and the location > department > team tree.
//!
//! Each resolver preloads its target table into a natural-key cache, stages
//! inserts and overwrite updates per batch, flushes them in one transaction
//! and merges the re-queried rows back into the cache.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use domain::{
    clean_text, location_code, PositionCode, DEFAULT_DEPARTMENT_NAME, DEFAULT_TEAM_NAME,
    DEPARTMENT_CODE_MAIN, TEAM_CODE_DEFAULT,
};

use super::context::RunContext;
use super::stats::PhaseStats;
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::legacy::store;
use crate::infra::repositories::entities::target::{department, location, position, team};
use crate::infra::{BatchedReader, UnitOfWork};
use crate::with_transaction;

/// Target location of one legacy store
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocationRef {
    pub id: i32,
    /// Trimmed legacy store name, if any
    pub store_name: Option<String>,
}

/// Target department of one legacy store
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DepartmentRef {
    pub id: i32,
    pub name: String,
}

/// Make sure both fixed positions exist and return `code -> id`.
pub(crate) async fn ensure_positions(
    ctx: &RunContext<'_>,
) -> AppResult<(HashMap<PositionCode, i32>, PhaseStats)> {
    let existing: HashMap<String, position::Model> = position::Entity::find()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|p| (p.code.clone(), p))
        .collect();

    let mut stats = PhaseStats::default();
    let mut inserts = Vec::new();
    let mut updates = Vec::new();

    for code in PositionCode::ALL {
        match existing.get(code.code()) {
            Some(row) if ctx.overwrite && row.name != code.display_name() => {
                updates.push(position::ActiveModel {
                    id: Set(row.id),
                    name: Set(code.display_name().to_string()),
                    ..Default::default()
                });
                stats.updated += 1;
            }
            Some(_) => stats.unchanged += 1,
            None => {
                inserts.push(position::ActiveModel {
                    code: Set(code.code().to_string()),
                    name: Set(code.display_name().to_string()),
                    ..Default::default()
                });
                stats.inserted += 1;
            }
        }
    }

    let rows: Vec<position::Model> = if inserts.is_empty() && updates.is_empty() {
        existing.into_values().collect()
    } else {
        let chunk = ctx.chunk_size();
        with_transaction!(ctx.target, |tx| {
            tx.insert_chunked(inserts, chunk).await?;
            tx.update_each(updates).await?;
            Ok(position::Entity::find().all(tx.conn()).await?)
        })?
    };

    let positions: HashMap<PositionCode, i32> = rows
        .into_iter()
        .filter_map(|p| PositionCode::from_code(&p.code).map(|code| (code, p.id)))
        .collect();

    for code in PositionCode::ALL {
        if !positions.contains_key(&code) {
            return Err(AppError::invariant(format!("position {} missing after upsert", code.code())));
        }
    }

    tracing::info!(
        inserted = stats.inserted,
        updated = stats.updated,
        "Positions ensured"
    );
    Ok((positions, stats))
}

/// Stores -> locations, keyed by `S{store_id}`. Returns `store_id -> location`.
pub(crate) async fn migrate_locations(
    ctx: &RunContext<'_>,
) -> AppResult<(HashMap<i32, LocationRef>, PhaseStats)> {
    tracing::info!("Migrating locations (store -> location)");

    let mut cache: HashMap<String, location::Model> = location::Entity::find()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|l| (l.code.clone(), l))
        .collect();

    let mut store_map = HashMap::new();
    let mut stats = PhaseStats::default();

    let paginator = store::Entity::find()
        .order_by_asc(store::Column::Id)
        .paginate(ctx.source, ctx.page_size());
    let mut reader = BatchedReader::new(paginator, ctx.page_size(), ctx.cancel.clone());

    while let Some(stores) = reader.next_batch().await? {
        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut touched = Vec::new();

        for s in &stores {
            let code = location_code(s.id);
            let name = clean_text(Some(&s.name)).unwrap_or_else(|| code.clone());

            match cache.get(&code) {
                Some(existing) if ctx.overwrite && existing.name != name => {
                    updates.push(location::ActiveModel {
                        id: Set(existing.id),
                        name: Set(name),
                        ..Default::default()
                    });
                    stats.updated += 1;
                    touched.push(code);
                }
                Some(_) => stats.unchanged += 1,
                None => {
                    inserts.push(location::ActiveModel {
                        code: Set(code.clone()),
                        name: Set(name),
                        is_active: Set(true),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    });
                    stats.inserted += 1;
                    touched.push(code);
                }
            }
        }

        if !touched.is_empty() {
            let chunk = ctx.chunk_size();
            let written = with_transaction!(ctx.target, |tx| {
                tx.insert_chunked(inserts, chunk).await?;
                tx.update_each(updates).await?;
                Ok(location::Entity::find()
                    .filter(location::Column::Code.is_in(touched))
                    .all(tx.conn())
                    .await?)
            })?;
            for row in written {
                cache.insert(row.code.clone(), row);
            }
        }

        for s in &stores {
            if let Some(row) = cache.get(&location_code(s.id)) {
                store_map.insert(
                    s.id,
                    LocationRef {
                        id: row.id,
                        store_name: clean_text(Some(&s.name)),
                    },
                );
            }
        }

        tracing::debug!(batch = stores.len(), mapped = store_map.len(), "Location batch flushed");
    }

    tracing::info!(
        mapped = store_map.len(),
        inserted = stats.inserted,
        updated = stats.updated,
        "Locations migrated"
    );
    Ok((store_map, stats))
}

/// One `MAIN` department per location. Returns `store_id -> department`.
pub(crate) async fn migrate_departments(
    ctx: &RunContext<'_>,
    locations: &HashMap<i32, LocationRef>,
) -> AppResult<(HashMap<i32, DepartmentRef>, PhaseStats)> {
    tracing::info!("Migrating departments (location -> MAIN department)");

    let mut cache: HashMap<i32, department::Model> = department::Entity::find()
        .filter(department::Column::Code.eq(DEPARTMENT_CODE_MAIN))
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|d| (d.location_id, d))
        .collect();

    let mut store_ids: Vec<i32> = locations.keys().copied().collect();
    store_ids.sort_unstable();

    let mut dept_map = HashMap::new();
    let mut stats = PhaseStats::default();

    for batch in store_ids.chunks(ctx.page_size() as usize) {
        ctx.check_cancelled()?;

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut touched = Vec::new();

        for store_id in batch {
            let Some(location) = locations.get(store_id) else {
                continue;
            };
            let name = location
                .store_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DEPARTMENT_NAME.to_string());

            match cache.get(&location.id) {
                Some(existing) if ctx.overwrite && existing.name != name => {
                    updates.push(department::ActiveModel {
                        id: Set(existing.id),
                        name: Set(name),
                        ..Default::default()
                    });
                    stats.updated += 1;
                    touched.push(location.id);
                }
                Some(_) => stats.unchanged += 1,
                None => {
                    inserts.push(department::ActiveModel {
                        location_id: Set(location.id),
                        code: Set(DEPARTMENT_CODE_MAIN.to_string()),
                        name: Set(name),
                        is_active: Set(true),
                        ..Default::default()
                    });
                    stats.inserted += 1;
                    touched.push(location.id);
                }
            }
        }

        if !touched.is_empty() {
            let chunk = ctx.chunk_size();
            let written = with_transaction!(ctx.target, |tx| {
                tx.insert_chunked(inserts, chunk).await?;
                tx.update_each(updates).await?;
                Ok(department::Entity::find()
                    .filter(department::Column::Code.eq(DEPARTMENT_CODE_MAIN))
                    .filter(department::Column::LocationId.is_in(touched))
                    .all(tx.conn())
                    .await?)
            })?;
            for row in written {
                cache.insert(row.location_id, row);
            }
        }

        for store_id in batch {
            let resolved = locations
                .get(store_id)
                .and_then(|location| cache.get(&location.id));
            if let Some(row) = resolved {
                dept_map.insert(
                    *store_id,
                    DepartmentRef {
                        id: row.id,
                        name: row.name.clone(),
                    },
                );
            }
        }
    }

    tracing::info!(
        mapped = dept_map.len(),
        inserted = stats.inserted,
        updated = stats.updated,
        "Departments migrated"
    );
    Ok((dept_map, stats))
}

/// One `DEFAULT` team per department. Returns `store_id -> team_id`.
pub(crate) async fn migrate_teams(
    ctx: &RunContext<'_>,
    departments: &HashMap<i32, DepartmentRef>,
) -> AppResult<(HashMap<i32, i32>, PhaseStats)> {
    tracing::info!("Migrating teams (department -> DEFAULT team)");

    let mut cache: HashMap<i32, team::Model> = team::Entity::find()
        .filter(team::Column::Code.eq(TEAM_CODE_DEFAULT))
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|t| (t.department_id, t))
        .collect();

    let mut store_ids: Vec<i32> = departments.keys().copied().collect();
    store_ids.sort_unstable();

    let mut team_map = HashMap::new();
    let mut stats = PhaseStats::default();

    for batch in store_ids.chunks(ctx.page_size() as usize) {
        ctx.check_cancelled()?;

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut touched = Vec::new();

        for store_id in batch {
            let Some(dept) = departments.get(store_id) else {
                continue;
            };
            let name = clean_text(Some(&dept.name)).unwrap_or_else(|| DEFAULT_TEAM_NAME.to_string());

            match cache.get(&dept.id) {
                Some(existing) if ctx.overwrite && existing.name != name => {
                    updates.push(team::ActiveModel {
                        id: Set(existing.id),
                        name: Set(name),
                        ..Default::default()
                    });
                    stats.updated += 1;
                    touched.push(dept.id);
                }
                Some(_) => stats.unchanged += 1,
                None => {
                    inserts.push(team::ActiveModel {
                        department_id: Set(dept.id),
                        code: Set(TEAM_CODE_DEFAULT.to_string()),
                        name: Set(name),
                        is_active: Set(true),
                        ..Default::default()
                    });
                    stats.inserted += 1;
                    touched.push(dept.id);
                }
            }
        }

        if !touched.is_empty() {
            let chunk = ctx.chunk_size();
            let written = with_transaction!(ctx.target, |tx| {
                tx.insert_chunked(inserts, chunk).await?;
                tx.update_each(updates).await?;
                Ok(team::Entity::find()
                    .filter(team::Column::Code.eq(TEAM_CODE_DEFAULT))
                    .filter(team::Column::DepartmentId.is_in(touched))
                    .all(tx.conn())
                    .await?)
            })?;
            for row in written {
                cache.insert(row.department_id, row);
            }
        }

        for store_id in batch {
            let resolved = departments
                .get(store_id)
                .and_then(|dept| cache.get(&dept.id));
            if let Some(row) = resolved {
                team_map.insert(*store_id, row.id);
            }
        }
    }

    tracing::info!(
        mapped = team_map.len(),
        inserted = stats.inserted,
        updated = stats.updated,
        "Teams migrated"
    );
    Ok((team_map, stats))
}
