//! Roster transformer: legacy shift details -> one canonical entry per
//! employee-day, inside lazily created monthly periods.
//!
//! Source rows arrive ordered by (date, employee, detail id). A page can end
//! in the middle of a day, so the rows of the last day of every page are
//! carried into the next window. Each processed window therefore holds only
//! complete days and no (employee, day) group is ever split across windows.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, SelectModel, Selector, Set,
};

use domain::{
    compose_note, select_canonical, ClassifiedDetail, PeriodKey, ShiftAssignment,
    PERIOD_CREATED_BY, PERIOD_STATUS_DRAFT, PERIOD_TYPE_MONTH,
};

use super::context::RunContext;
use super::stats::RosterStats;
use super::vocabulary::Vocabulary;
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::entities::legacy::{shift_code, shift_schedule, shift_schedule_detail};
use crate::infra::repositories::entities::target::{roster_entry, roster_period};
use crate::infra::{BatchedReader, TransactionContext, UnitOfWork};
use crate::with_transaction;

/// One legacy shift detail joined with its schedule header and code
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub(crate) struct SourceDetail {
    pub detail_id: i32,
    /// Legacy user id
    pub employee_id: i32,
    pub store_id: i32,
    pub date: NaiveDate,
    pub shift_code: String,
    pub work_unit: f64,
}

/// Maps produced by the earlier phases
pub(crate) struct RosterLookups<'a> {
    pub store_to_team: &'a HashMap<i32, i32>,
    pub user_to_employee: &'a HashMap<i32, i32>,
    pub vocabulary: &'a Vocabulary,
}

/// Canonical entry computed for one (store, employee, day) group
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlannedEntry {
    pub period: PeriodKey,
    pub employee_id: i32,
    pub work_date: NaiveDate,
    pub assignment: ShiftAssignment,
    pub note: String,
}

pub(crate) async fn migrate_roster(
    ctx: &RunContext<'_>,
    lookups: &RosterLookups<'_>,
) -> AppResult<RosterStats> {
    tracing::info!("Migrating roster (schedules -> periods and entries)");

    let mut registry: HashMap<PeriodKey, i32> = roster_period::Entity::find()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|p| (p.key(), p.id))
        .collect();

    let mut stats = RosterStats::default();

    let paginator = source_details().paginate(ctx.source, ctx.page_size());
    let mut reader = BatchedReader::new(paginator, ctx.page_size(), ctx.cancel.clone());
    let mut carry: Vec<SourceDetail> = Vec::new();

    while let Some(page) = reader.next_batch().await? {
        stats.source_rows += page.len() as u64;

        let mut window = std::mem::take(&mut carry);
        window.extend(page);
        let (complete, trailing) = split_complete_days(window, |row| row.date);
        carry = trailing;

        if !complete.is_empty() {
            process_window(ctx, lookups, &mut registry, &complete, &mut stats).await?;
        }
    }

    if !carry.is_empty() {
        process_window(ctx, lookups, &mut registry, &carry, &mut stats).await?;
    }

    tracing::info!(
        source_rows = stats.source_rows,
        periods_created = stats.periods_created,
        inserted = stats.inserted,
        updated = stats.updated,
        unchanged = stats.unchanged,
        skipped_unmapped_team = stats.skipped_unmapped_team,
        skipped_unmapped_employee = stats.skipped_unmapped_employee,
        skipped_unclassified = stats.skipped_unclassified,
        "Roster migrated"
    );
    Ok(stats)
}

/// Detail x schedule x code, in a total order
fn source_details() -> Selector<SelectModel<SourceDetail>> {
    shift_schedule_detail::Entity::find()
        .select_only()
        .column_as(shift_schedule_detail::Column::Id, "detail_id")
        .column_as(shift_schedule::Column::EmployeeId, "employee_id")
        .column_as(shift_schedule::Column::StoreId, "store_id")
        .column_as(shift_schedule::Column::Date, "date")
        .column_as(shift_code::Column::Code, "shift_code")
        .column_as(shift_schedule_detail::Column::WorkUnit, "work_unit")
        .join(JoinType::InnerJoin, shift_schedule_detail::Relation::Schedule.def())
        .join(JoinType::InnerJoin, shift_schedule_detail::Relation::ShiftCode.def())
        .order_by_asc(shift_schedule::Column::Date)
        .order_by_asc(shift_schedule::Column::EmployeeId)
        .order_by_asc(shift_schedule_detail::Column::Id)
        .into_model::<SourceDetail>()
}

/// Split date-ordered `rows` into the complete days and the rows of the last
/// day, which may continue on the next page.
pub(crate) fn split_complete_days<T, F>(mut rows: Vec<T>, day_of: F) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> NaiveDate,
{
    let Some(last_day) = rows.last().map(&day_of) else {
        return (rows, Vec::new());
    };
    let cut = rows.partition_point(|row| day_of(row) < last_day);
    let trailing = rows.split_off(cut);
    (rows, trailing)
}

/// Collapse a window of complete days into one planned entry per group.
///
/// Groups with an unmapped team or employee, or without any known code, are
/// dropped and counted.
pub(crate) fn plan_window(
    rows: &[SourceDetail],
    lookups: &RosterLookups<'_>,
    stats: &mut RosterStats,
) -> AppResult<Vec<PlannedEntry>> {
    let mut groups: BTreeMap<(NaiveDate, i32, i32), Vec<&SourceDetail>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.date, row.employee_id, row.store_id))
            .or_default()
            .push(row);
    }

    let mut planned = Vec::with_capacity(groups.len());

    for ((date, user_id, store_id), details) in groups {
        let Some(&team_id) = lookups.store_to_team.get(&store_id) else {
            tracing::debug!(store_id, user_id, %date, "Dropping roster group: store has no team");
            stats.skipped_unmapped_team += 1;
            continue;
        };
        let Some(&employee_id) = lookups.user_to_employee.get(&user_id) else {
            tracing::debug!(store_id, user_id, %date, "Dropping roster group: user was not migrated");
            stats.skipped_unmapped_employee += 1;
            continue;
        };

        let classified: Vec<ClassifiedDetail> = details
            .iter()
            .filter_map(|d| {
                let code = d.shift_code.trim();
                lookups
                    .vocabulary
                    .get(code)
                    .map(|entry| ClassifiedDetail::new(code, entry.category, d.work_unit))
            })
            .collect();

        let Some(selected) = select_canonical(&classified) else {
            tracing::debug!(user_id, %date, "Dropping roster group: no known shift code");
            stats.skipped_unclassified += 1;
            continue;
        };

        let entry = lookups.vocabulary.get(&selected.code).ok_or_else(|| {
            AppError::invariant(format!("selected code {} is not in the vocabulary", selected.code))
        })?;

        planned.push(PlannedEntry {
            period: PeriodKey::for_day(team_id, date),
            employee_id,
            work_date: date,
            assignment: entry.assignment(&selected.code),
            note: compose_note(details.iter().map(|d| d.shift_code.as_str())),
        });
    }

    Ok(planned)
}

async fn process_window(
    ctx: &RunContext<'_>,
    lookups: &RosterLookups<'_>,
    registry: &mut HashMap<PeriodKey, i32>,
    rows: &[SourceDetail],
    stats: &mut RosterStats,
) -> AppResult<()> {
    ctx.check_cancelled()?;

    let entries = plan_window(rows, lookups, stats)?;
    if entries.is_empty() {
        return Ok(());
    }

    let needed: BTreeSet<PeriodKey> = entries.iter().map(|e| e.period).collect();
    let mut known = HashMap::new();
    let mut missing = Vec::new();
    for key in needed {
        match registry.get(&key) {
            Some(id) => {
                known.insert(key, *id);
            }
            None => missing.push(key),
        }
    }

    let plan = WindowPlan {
        entries,
        known_periods: known,
        missing_periods: missing,
        overwrite: ctx.overwrite,
        chunk_size: ctx.chunk_size(),
    };
    let outcome = with_transaction!(ctx.target, |tx| { write_window(tx, plan).await })?;

    stats.periods_created += outcome.created_periods.len() as u64;
    stats.inserted += outcome.inserted;
    stats.updated += outcome.updated;
    stats.unchanged += outcome.unchanged;
    registry.extend(outcome.created_periods);

    tracing::debug!(
        rows = rows.len(),
        inserted = outcome.inserted,
        updated = outcome.updated,
        "Roster window committed"
    );
    Ok(())
}

/// Everything one window transaction needs, owned
struct WindowPlan {
    entries: Vec<PlannedEntry>,
    known_periods: HashMap<PeriodKey, i32>,
    missing_periods: Vec<PeriodKey>,
    overwrite: bool,
    chunk_size: usize,
}

#[derive(Debug, Default)]
struct WindowOutcome {
    created_periods: Vec<(PeriodKey, i32)>,
    inserted: u64,
    updated: u64,
    unchanged: u64,
}

async fn write_window(tx: TransactionContext<'_>, plan: WindowPlan) -> AppResult<WindowOutcome> {
    let mut outcome = WindowOutcome::default();
    let mut periods = plan.known_periods;

    if !plan.missing_periods.is_empty() {
        create_periods(&tx, &plan.missing_periods, plan.chunk_size, &mut outcome).await?;
        periods.extend(outcome.created_periods.iter().copied());
    }

    let (Some(first_day), Some(last_day)) = (
        plan.entries.iter().map(|e| e.work_date).min(),
        plan.entries.iter().map(|e| e.work_date).max(),
    ) else {
        return Ok(outcome);
    };

    let period_ids: Vec<i32> = periods.values().copied().collect();
    let existing: HashMap<(i32, i32, NaiveDate), roster_entry::Model> = roster_entry::Entity::find()
        .filter(roster_entry::Column::RosterPeriodId.is_in(period_ids))
        .filter(roster_entry::Column::WorkDate.between(first_day, last_day))
        .all(tx.conn())
        .await?
        .into_iter()
        .map(|e| ((e.roster_period_id, e.employee_id, e.work_date), e))
        .collect();

    let mut inserts = Vec::new();
    let mut updates = Vec::new();
    let mut staged = HashSet::new();

    for entry in plan.entries {
        let period_id = *periods.get(&entry.period).ok_or_else(|| {
            AppError::invariant(format!("no roster period for {:?}", entry.period))
        })?;
        let key = (period_id, entry.employee_id, entry.work_date);
        if !staged.insert(key) {
            outcome.unchanged += 1;
            continue;
        }

        match existing.get(&key) {
            Some(current) if plan.overwrite => {
                let same = current.assignment().ok().as_ref() == Some(&entry.assignment)
                    && current.note.as_deref() == Some(entry.note.as_str());
                if same {
                    outcome.unchanged += 1;
                    continue;
                }
                let (shift_base_id, leave_code) = entry.assignment.into_columns();
                updates.push(roster_entry::ActiveModel {
                    id: Set(current.id),
                    shift_base_id: Set(shift_base_id),
                    leave_code: Set(leave_code),
                    note: Set(Some(entry.note)),
                    ..Default::default()
                });
                outcome.updated += 1;
            }
            Some(_) => outcome.unchanged += 1,
            None => {
                let (shift_base_id, leave_code) = entry.assignment.into_columns();
                inserts.push(roster_entry::ActiveModel {
                    roster_period_id: Set(period_id),
                    employee_id: Set(entry.employee_id),
                    work_date: Set(entry.work_date),
                    shift_base_id: Set(shift_base_id),
                    leave_code: Set(leave_code),
                    start_time_override: Set(None),
                    end_time_override: Set(None),
                    note: Set(Some(entry.note)),
                    attributes: Set(None),
                    ..Default::default()
                });
                outcome.inserted += 1;
            }
        }
    }

    tx.insert_chunked(inserts, plan.chunk_size).await?;
    tx.update_each(updates).await?;

    Ok(outcome)
}

/// Insert the missing monthly periods and record their new ids
async fn create_periods(
    tx: &TransactionContext<'_>,
    missing: &[PeriodKey],
    chunk_size: usize,
    outcome: &mut WindowOutcome,
) -> AppResult<()> {
    let now = Utc::now();
    let mut rows = Vec::with_capacity(missing.len());
    let mut starts = Vec::with_capacity(missing.len());

    for key in missing {
        let (start, end) = key.bounds()?;
        starts.push(start);
        rows.push(roster_period::ActiveModel {
            team_id: Set(key.team_id),
            period_start_date: Set(start),
            period_end_date: Set(end),
            period_type: Set(PERIOD_TYPE_MONTH.to_string()),
            status: Set(PERIOD_STATUS_DRAFT.to_string()),
            created_by: Set(Some(PERIOD_CREATED_BY.to_string())),
            created_at: Set(now),
            ..Default::default()
        });
    }

    tx.insert_chunked(rows, chunk_size).await?;

    let team_ids: BTreeSet<i32> = missing.iter().map(|k| k.team_id).collect();
    let wanted: HashSet<PeriodKey> = missing.iter().copied().collect();

    let written = roster_period::Entity::find()
        .filter(roster_period::Column::TeamId.is_in(team_ids))
        .filter(roster_period::Column::PeriodStartDate.is_in(starts))
        .all(tx.conn())
        .await?;

    for row in written {
        let key = row.key();
        if wanted.contains(&key) {
            outcome.created_periods.push((key, row.id));
        }
    }

    if outcome.created_periods.len() != missing.len() {
        return Err(AppError::invariant(format!(
            "created {} roster periods but found {}",
            missing.len(),
            outcome.created_periods.len()
        )));
    }
    Ok(())
}
