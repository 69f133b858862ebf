//! Employee resolver: legacy users -> target employees.

use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use domain::{clean_text, infer_position, status_label, PositionCode};

use super::context::RunContext;
use super::stats::PhaseStats;
use crate::errors::AppResult;
use crate::infra::repositories::entities::legacy::{role, user, user_role};
use crate::infra::repositories::entities::target::employee;
use crate::infra::{BatchedReader, UnitOfWork};
use crate::with_transaction;

/// Result of the employee phase
#[derive(Debug, Default)]
pub(crate) struct EmployeeOutcome {
    /// Legacy user id -> target employee id
    pub user_to_employee: HashMap<i32, i32>,
    pub stats: PhaseStats,
    pub teamless: u64,
}

/// Values an employee row should carry according to its legacy user
struct Resolved {
    emp_code: String,
    full_name: Option<String>,
    team_id: Option<i32>,
    position_id: Option<i32>,
    status: &'static str,
    phone: Option<String>,
    hire_date: chrono::NaiveDate,
}

impl Resolved {
    fn insert_model(&self, created_at: chrono::DateTime<chrono::Utc>) -> employee::ActiveModel {
        employee::ActiveModel {
            emp_code: Set(self.emp_code.clone()),
            full_name: Set(self
                .full_name
                .clone()
                .unwrap_or_else(|| self.emp_code.clone())),
            team_id: Set(self.team_id),
            position_id: Set(self.position_id),
            status: Set(self.status.to_string()),
            phone: Set(self.phone.clone()),
            hire_date: Set(Some(self.hire_date)),
            attributes: Set(None),
            created_at: Set(created_at),
            ..Default::default()
        }
    }

    /// Overwrite update for `existing`, or `None` when nothing would change.
    ///
    /// Blank names and unresolved team/position keep the stored value; the
    /// hire date is only filled in when missing.
    fn update_model(&self, existing: &employee::Model) -> Option<employee::ActiveModel> {
        let full_name = self.full_name.clone().unwrap_or_else(|| existing.full_name.clone());
        let team_id = self.team_id.or(existing.team_id);
        let position_id = self.position_id.or(existing.position_id);
        let hire_date = existing.hire_date.or(Some(self.hire_date));

        let unchanged = full_name == existing.full_name
            && team_id == existing.team_id
            && position_id == existing.position_id
            && self.status == existing.status
            && self.phone == existing.phone
            && hire_date == existing.hire_date;
        if unchanged {
            return None;
        }

        Some(employee::ActiveModel {
            id: Set(existing.id),
            full_name: Set(full_name),
            team_id: Set(team_id),
            position_id: Set(position_id),
            status: Set(self.status.to_string()),
            phone: Set(self.phone.clone()),
            hire_date: Set(hire_date),
            ..Default::default()
        })
    }
}

pub(crate) async fn migrate_employees(
    ctx: &RunContext<'_>,
    store_to_team: &HashMap<i32, i32>,
    positions: &HashMap<PositionCode, i32>,
) -> AppResult<EmployeeOutcome> {
    tracing::info!("Migrating employees (user -> employee)");

    let mut cache: HashMap<String, employee::Model> = employee::Entity::find()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|e| (e.emp_code.clone(), e))
        .collect();

    let mut outcome = EmployeeOutcome::default();

    let paginator = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .paginate(ctx.source, ctx.page_size());
    let mut reader = BatchedReader::new(paginator, ctx.page_size(), ctx.cancel.clone());

    while let Some(users) = reader.next_batch().await? {
        let role_tags = load_role_tags(ctx, &users).await?;

        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut touched = Vec::new();
        let mut staged = HashSet::new();
        let mut keyed = Vec::with_capacity(users.len());

        for u in &users {
            let Some(emp_code) = clean_text(Some(&u.username)) else {
                tracing::warn!(user_id = u.id, "Skipping user with empty username");
                outcome.stats.skipped += 1;
                continue;
            };
            keyed.push((u.id, emp_code.clone()));

            if !staged.insert(emp_code.clone()) {
                outcome.stats.unchanged += 1;
                continue;
            }

            let team_id = u.store_id.and_then(|store_id| store_to_team.get(&store_id).copied());
            if team_id.is_none() {
                tracing::warn!(
                    user_id = u.id,
                    store_id = ?u.store_id,
                    "No team for user's store, migrating employee without team"
                );
                outcome.teamless += 1;
            }

            let tags = role_tags.get(&u.id).map(Vec::as_slice).unwrap_or_default();
            let position = infer_position(tags);

            let resolved = Resolved {
                emp_code: emp_code.clone(),
                full_name: clean_text(u.full_name.as_deref()),
                team_id,
                position_id: positions.get(&position).copied(),
                status: status_label(u.status),
                phone: clean_text(u.phone_number.as_deref()),
                hire_date: u.created_at.date(),
            };

            match cache.get(&emp_code) {
                Some(existing) if ctx.overwrite => match resolved.update_model(existing) {
                    Some(update) => {
                        updates.push(update);
                        outcome.stats.updated += 1;
                        touched.push(emp_code);
                    }
                    None => outcome.stats.unchanged += 1,
                },
                Some(_) => outcome.stats.unchanged += 1,
                None => {
                    inserts.push(resolved.insert_model(u.created_at.and_utc()));
                    outcome.stats.inserted += 1;
                    touched.push(emp_code);
                }
            }
        }

        if !touched.is_empty() {
            let chunk = ctx.chunk_size();
            let written = with_transaction!(ctx.target, |tx| {
                tx.insert_chunked(inserts, chunk).await?;
                tx.update_each(updates).await?;
                Ok(employee::Entity::find()
                    .filter(employee::Column::EmpCode.is_in(touched))
                    .all(tx.conn())
                    .await?)
            })?;
            for row in written {
                cache.insert(row.emp_code.clone(), row);
            }
        }

        for (user_id, emp_code) in keyed {
            if let Some(row) = cache.get(&emp_code) {
                outcome.user_to_employee.insert(user_id, row.id);
            }
        }

        tracing::debug!(
            batch = users.len(),
            mapped = outcome.user_to_employee.len(),
            "Employee batch flushed"
        );
    }

    tracing::info!(
        mapped = outcome.user_to_employee.len(),
        inserted = outcome.stats.inserted,
        updated = outcome.stats.updated,
        skipped = outcome.stats.skipped,
        teamless = outcome.teamless,
        "Employees migrated"
    );
    Ok(outcome)
}

/// Role names per user for one batch of users
async fn load_role_tags(
    ctx: &RunContext<'_>,
    users: &[user::Model],
) -> AppResult<HashMap<i32, Vec<String>>> {
    let user_ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = user_role::Entity::find()
        .filter(user_role::Column::UserId.is_in(user_ids))
        .order_by_asc(user_role::Column::Id)
        .find_also_related(role::Entity)
        .all(ctx.source)
        .await?;

    let mut tags: HashMap<i32, Vec<String>> = HashMap::new();
    for (link, role) in rows {
        if let Some(role) = role {
            tags.entry(link.user_id).or_default().push(role.role_name);
        }
    }
    Ok(tags)
}
