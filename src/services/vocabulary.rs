//! Shift vocabulary resolver: legacy shift codes -> target shift bases.

use std::collections::{BTreeMap, HashMap, HashSet};

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use domain::{clean_text, ShiftCategory, VocabularyEntry};

use super::context::RunContext;
use super::stats::PhaseStats;
use crate::errors::AppResult;
use crate::infra::repositories::entities::legacy::shift_code;
use crate::infra::repositories::entities::target::shift_base;
use crate::infra::{BatchedReader, UnitOfWork};
use crate::with_transaction;

/// Trimmed shift code -> target shift base and category
pub(crate) type Vocabulary = HashMap<String, VocabularyEntry>;

pub(crate) async fn migrate_shift_bases(ctx: &RunContext<'_>) -> AppResult<(Vocabulary, PhaseStats)> {
    tracing::info!("Migrating shift bases (shift code -> shift base)");

    let mut cache: HashMap<String, shift_base::Model> = shift_base::Entity::find()
        .all(ctx.target.connection())
        .await?
        .into_iter()
        .map(|s| (s.code.clone(), s))
        .collect();

    let mut vocabulary = Vocabulary::new();
    let mut stats = PhaseStats::default();

    let paginator = shift_code::Entity::find()
        .order_by_asc(shift_code::Column::Id)
        .paginate(ctx.source, ctx.page_size());
    let mut reader = BatchedReader::new(paginator, ctx.page_size(), ctx.cancel.clone());

    while let Some(codes) = reader.next_batch().await? {
        let mut inserts = Vec::new();
        let mut updates = Vec::new();
        let mut touched = Vec::new();
        let mut staged = HashSet::new();
        let mut classified = Vec::with_capacity(codes.len());

        for sc in &codes {
            let Some(code) = clean_text(Some(&sc.code)) else {
                tracing::warn!(shift_code_id = sc.id, "Skipping shift code with empty code");
                stats.skipped += 1;
                continue;
            };
            let category = ShiftCategory::classify(sc.is_leave, sc.work_unit);
            let name = clean_text(sc.description.as_deref());
            classified.push((code.clone(), category));

            if !staged.insert(code.clone()) {
                stats.unchanged += 1;
                continue;
            }

            match cache.get(&code) {
                Some(existing)
                    if ctx.overwrite
                        && (existing.name != name || existing.category != category.as_str()) =>
                {
                    updates.push(shift_base::ActiveModel {
                        id: Set(existing.id),
                        name: Set(name),
                        category: Set(category.as_str().to_string()),
                        ..Default::default()
                    });
                    stats.updated += 1;
                    touched.push(code);
                }
                Some(_) => stats.unchanged += 1,
                None => {
                    inserts.push(shift_base::ActiveModel {
                        code: Set(code.clone()),
                        name: Set(name),
                        start_time: Set(None),
                        end_time: Set(None),
                        break_minutes: Set(0),
                        is_overnight: Set(false),
                        category: Set(category.as_str().to_string()),
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
                Ok(shift_base::Entity::find()
                    .filter(shift_base::Column::Code.is_in(touched))
                    .all(tx.conn())
                    .await?)
            })?;
            for row in written {
                cache.insert(row.code.clone(), row);
            }
        }

        for (code, category) in classified {
            if let Some(row) = cache.get(&code) {
                vocabulary.insert(code, VocabularyEntry::new(row.id, category));
            }
        }
    }

    tracing::info!(
        codes = vocabulary.len(),
        inserted = stats.inserted,
        updated = stats.updated,
        skipped = stats.skipped,
        "Shift bases migrated"
    );
    Ok((vocabulary, stats))
}

/// Vocabulary size per category
pub(crate) fn category_counts(vocabulary: &Vocabulary) -> BTreeMap<ShiftCategory, u64> {
    let mut counts = BTreeMap::new();
    for entry in vocabulary.values() {
        *counts.entry(entry.category).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_counts() {
        let mut vocabulary = Vocabulary::new();
        vocabulary.insert("C1".into(), VocabularyEntry::new(1, ShiftCategory::Work));
        vocabulary.insert("C2".into(), VocabularyEntry::new(2, ShiftCategory::Work));
        vocabulary.insert("OFF".into(), VocabularyEntry::new(3, ShiftCategory::Off));

        let counts = category_counts(&vocabulary);
        assert_eq!(counts.get(&ShiftCategory::Work), Some(&2));
        assert_eq!(counts.get(&ShiftCategory::Off), Some(&1));
        assert_eq!(counts.get(&ShiftCategory::Leave), None);
    }
}
