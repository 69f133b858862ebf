//! Calendar generator: whole months covering every legacy schedule date.

use std::collections::HashSet;

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use domain::{days_inclusive, expand_to_months, CalendarDay};

use super::context::{chunked, RunContext};
use crate::errors::AppResult;
use crate::infra::repositories::entities::legacy::shift_schedule;
use crate::infra::repositories::entities::target::calendar_date;
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Insert the missing days of the covered months. Existing days are never
/// modified. Returns the number of days inserted.
pub(crate) async fn generate_calendar(
    ctx: &RunContext<'_>,
    holidays: &HashSet<NaiveDate>,
) -> AppResult<u64> {
    let Some((min, max)) = schedule_date_range(ctx).await? else {
        tracing::info!("No schedules found, skipping calendar");
        return Ok(0);
    };

    let (start, end) = expand_to_months(min, max)?;

    let existing: HashSet<NaiveDate> = calendar_date::Entity::find()
        .select_only()
        .column(calendar_date::Column::Date)
        .filter(calendar_date::Column::Date.between(start, end))
        .into_tuple::<NaiveDate>()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .collect();

    let missing: Vec<calendar_date::ActiveModel> = days_inclusive(start, end)
        .filter(|day| !existing.contains(day))
        .map(|day| CalendarDay::new(day, holidays.contains(&day)).into())
        .collect();

    let inserted = missing.len() as u64;
    let chunk = ctx.chunk_size();
    for batch in chunked(missing, chunk) {
        ctx.check_cancelled()?;
        with_transaction!(ctx.target, |tx| {
            tx.insert_chunked(batch, chunk).await?;
            Ok(())
        })?;
    }

    tracing::info!(%start, %end, inserted, "Calendar dates ensured");
    Ok(inserted)
}

/// Earliest and latest legacy schedule date, if any schedule exists
async fn schedule_date_range(ctx: &RunContext<'_>) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    let min = shift_schedule::Entity::find()
        .select_only()
        .column(shift_schedule::Column::Date)
        .order_by_asc(shift_schedule::Column::Date)
        .into_tuple::<NaiveDate>()
        .one(ctx.source)
        .await?;
    let max = shift_schedule::Entity::find()
        .select_only()
        .column(shift_schedule::Column::Date)
        .order_by_desc(shift_schedule::Column::Date)
        .into_tuple::<NaiveDate>()
        .one(ctx.source)
        .await?;

    Ok(min.zip(max))
}
