//! Alias materializer: one alias per (team, vocabulary code).

use std::collections::HashMap;

use sea_orm::{EntityTrait, Set};

use domain::ShiftAssignment;

use super::context::{chunked, RunContext};
use super::stats::PhaseStats;
use super::vocabulary::Vocabulary;
use crate::errors::AppResult;
use crate::infra::repositories::entities::target::team_shift_alias;
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Ensure every team has an alias for every vocabulary code.
///
/// OFF and LEAVE codes alias a leave code, WORK codes alias their shift
/// base. Under overwrite, aliases pointing elsewhere are repointed. Each
/// write chunk commits on its own.
pub(crate) async fn materialize_aliases(
    ctx: &RunContext<'_>,
    team_ids: &[i32],
    vocabulary: &Vocabulary,
) -> AppResult<PhaseStats> {
    tracing::info!(
        teams = team_ids.len(),
        codes = vocabulary.len(),
        "Materializing team shift aliases"
    );

    let existing: HashMap<(i32, String), team_shift_alias::Model> = team_shift_alias::Entity::find()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|a| ((a.team_id, a.alias_code.clone()), a))
        .collect();

    let mut codes: Vec<&String> = vocabulary.keys().collect();
    codes.sort();

    let mut stats = PhaseStats::default();
    let mut inserts = Vec::new();
    let mut updates = Vec::new();

    for team_id in team_ids {
        for code in &codes {
            let Some(entry) = vocabulary.get(*code) else {
                continue;
            };
            let wanted = entry.assignment(code);

            match existing.get(&(*team_id, (*code).clone())) {
                Some(alias) if ctx.overwrite && alias.assignment().ok().as_ref() != Some(&wanted) => {
                    let (shift_base_id, leave_code) = wanted.into_columns();
                    updates.push(team_shift_alias::ActiveModel {
                        id: Set(alias.id),
                        shift_base_id: Set(shift_base_id),
                        leave_code: Set(leave_code),
                        ..Default::default()
                    });
                    stats.updated += 1;
                }
                Some(_) => stats.unchanged += 1,
                None => {
                    inserts.push(new_alias(*team_id, code, wanted));
                    stats.inserted += 1;
                }
            }
        }
    }

    let chunk = ctx.chunk_size();
    for batch in chunked(inserts, chunk) {
        ctx.check_cancelled()?;
        with_transaction!(ctx.target, |tx| {
            tx.insert_chunked(batch, chunk).await?;
            Ok(())
        })?;
    }
    for batch in chunked(updates, chunk) {
        ctx.check_cancelled()?;
        with_transaction!(ctx.target, |tx| {
            tx.update_each(batch).await?;
            Ok(())
        })?;
    }

    tracing::info!(
        inserted = stats.inserted,
        updated = stats.updated,
        unchanged = stats.unchanged,
        "Team shift aliases materialized"
    );
    Ok(stats)
}

fn new_alias(team_id: i32, code: &str, assignment: ShiftAssignment) -> team_shift_alias::ActiveModel {
    let (shift_base_id, leave_code) = assignment.into_columns();
    team_shift_alias::ActiveModel {
        team_id: Set(team_id),
        shift_base_id: Set(shift_base_id),
        leave_code: Set(leave_code),
        alias_code: Set(code.to_string()),
        ..Default::default()
    }
}
