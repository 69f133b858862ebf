//! Holiday resolver: legacy holidays -> target holidays keyed by date.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use domain::{clean_text, DEFAULT_HOLIDAY_NAME};

use super::context::RunContext;
use super::stats::PhaseStats;
use crate::errors::AppResult;
use crate::infra::repositories::entities::legacy::holiday as legacy_holiday;
use crate::infra::repositories::entities::target::holiday;
use crate::infra::{BatchedReader, UnitOfWork};
use crate::with_transaction;

/// Upsert holidays by date and return every holiday date now in the target.
pub(crate) async fn migrate_holidays(
    ctx: &RunContext<'_>,
) -> AppResult<(HashSet<NaiveDate>, PhaseStats)> {
    tracing::info!("Migrating holidays");

    let mut cache: HashMap<NaiveDate, holiday::Model> = holiday::Entity::find()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|h| (h.date, h))
        .collect();

    let mut stats = PhaseStats::default();

    let paginator = legacy_holiday::Entity::find()
        .order_by_asc(legacy_holiday::Column::Id)
        .paginate(ctx.source, ctx.page_size());
    let mut reader = BatchedReader::new(paginator, ctx.page_size(), ctx.cancel.clone());

    while let Some(rows) = reader.next_batch().await? {
        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut touched = Vec::new();
        let mut staged = HashSet::new();

        for row in &rows {
            if !staged.insert(row.date) {
                stats.unchanged += 1;
                continue;
            }
            let name = clean_text(row.description.as_deref())
                .unwrap_or_else(|| DEFAULT_HOLIDAY_NAME.to_string());

            match cache.get(&row.date) {
                Some(existing) if ctx.overwrite && existing.name != name => {
                    updates.push(holiday::ActiveModel {
                        id: Set(existing.id),
                        name: Set(name),
                        ..Default::default()
                    });
                    stats.updated += 1;
                    touched.push(row.date);
                }
                Some(_) => stats.unchanged += 1,
                None => {
                    inserts.push(holiday::ActiveModel {
                        date: Set(row.date),
                        name: Set(name),
                        ..Default::default()
                    });
                    stats.inserted += 1;
                    touched.push(row.date);
                }
            }
        }

        if !touched.is_empty() {
            let chunk = ctx.chunk_size();
            let written = with_transaction!(ctx.target, |tx| {
                tx.insert_chunked(inserts, chunk).await?;
                tx.update_each(updates).await?;
                Ok(holiday::Entity::find()
                    .filter(holiday::Column::Date.is_in(touched))
                    .all(tx.conn())
                    .await?)
            })?;
            for row in written {
                cache.insert(row.date, row);
            }
        }
    }

    tracing::info!(
        holidays = cache.len(),
        inserted = stats.inserted,
        updated = stats.updated,
        "Holidays migrated"
    );
    Ok((cache.into_keys().collect(), stats))
}
