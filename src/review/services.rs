use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::repo as catalog_repo;
use crate::diary::snapshot;
use crate::error::{AppError, AppResult};

use super::dto::{ReviewItem, SourceKind};
use super::repo;

/// One row per drifted source item across foods, meals, and exercises.
/// Items the user dismissed at the source's current version are excluded;
/// deleted sources are omitted rather than failing the listing.
pub async fn list_needs_review(db: &PgPool, user_id: Uuid) -> AppResult<Vec<ReviewItem>> {
    let mut items = Vec::new();
    for row in repo::foods_needing_review(db, user_id).await? {
        items.push(to_item(SourceKind::Food, row));
    }
    for row in repo::meals_needing_review(db, user_id).await? {
        items.push(to_item(SourceKind::Meal, row));
    }
    for row in repo::exercises_needing_review(db, user_id).await? {
        items.push(to_item(SourceKind::Exercise, row));
    }
    Ok(items)
}

pub async fn needs_review_count(db: &PgPool, user_id: Uuid) -> AppResult<usize> {
    Ok(list_needs_review(db, user_id).await?.len())
}

fn to_item(kind: SourceKind, row: repo::StaleSourceRow) -> ReviewItem {
    ReviewItem {
        source_kind: kind,
        source_id: row.source_id,
        name: row.name,
        source_updated_at: row.source_updated_at,
        entry_created_at: row.entry_created_at,
    }
}

/// Accept the source's current version: rewrite the snapshot of every entry
/// of this user referencing it, in one transaction, leaving dates and logged
/// quantities untouched. Clears any acknowledgment for the item.
pub async fn accept(
    db: &PgPool,
    user_id: Uuid,
    kind: SourceKind,
    source_id: Uuid,
) -> AppResult<u64> {
    let mut tx = db.begin().await?;
    let updated = match kind {
        SourceKind::Food => {
            let food = catalog_repo::get_food_by_id(&mut *tx, source_id, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("food not found"))?;
            let entries = repo::food_entry_refs(&mut *tx, user_id, source_id).await?;
            let variant_ids: Vec<Uuid> =
                entries.iter().filter_map(|e| e.variant_id).collect();
            let variants: HashMap<Uuid, _> =
                catalog_repo::get_food_variants_by_ids(&mut *tx, &variant_ids)
                    .await?
                    .into_iter()
                    .map(|v| (v.id, v))
                    .collect();

            let mut updated = 0u64;
            for entry in &entries {
                let Some(variant) = entry.variant_id.and_then(|id| variants.get(&id)) else {
                    warn!(entry_id = %entry.id, "variant gone, leaving entry snapshot as is");
                    continue;
                };
                let snap = snapshot::food_snapshot(
                    &food.name,
                    food.brand.as_deref(),
                    variant,
                    entry.quantity,
                    &entry.unit,
                )?;
                repo::update_food_entry_snapshot(&mut tx, entry.id, &snap).await?;
                updated += 1;
            }
            updated
        }
        SourceKind::Meal => {
            let meal = catalog_repo::get_meal_by_id(&mut *tx, source_id, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("meal not found"))?;
            repo::update_group_meal_names(&mut *tx, user_id, source_id, &meal.name).await?
        }
        SourceKind::Exercise => {
            let exercise = catalog_repo::get_exercise_by_id(&mut *tx, source_id, user_id)
                .await?
                .ok_or_else(|| AppError::not_found("exercise not found"))?;
            let snap = snapshot::exercise_snapshot(&exercise);
            let entries = repo::exercise_entry_refs(&mut *tx, user_id, source_id).await?;
            let mut updated = 0u64;
            for entry in &entries {
                let calories =
                    snapshot::calories_burned(snap.calories_per_hour, entry.duration_minutes);
                repo::update_exercise_entry_snapshot(&mut tx, entry.id, &snap, calories).await?;
                updated += 1;
            }
            updated
        }
    };
    repo::clear_ignored_update(&mut *tx, user_id, kind, source_id).await?;
    tx.commit().await?;
    info!(%user_id, kind = kind.as_str(), %source_id, updated, "review item accepted");
    Ok(updated)
}

/// Dismiss the source's current version. The marker stores the exact
/// `updated_at` being acknowledged; a later edit no longer matches and the
/// item reappears on its own.
pub async fn ignore(db: &PgPool, user_id: Uuid, kind: SourceKind, source_id: Uuid) -> AppResult<()> {
    let updated_at = match kind {
        SourceKind::Food => catalog_repo::get_food_by_id(db, source_id, user_id)
            .await?
            .map(|f| f.updated_at),
        SourceKind::Meal => catalog_repo::get_meal_by_id(db, source_id, user_id)
            .await?
            .map(|m| m.updated_at),
        SourceKind::Exercise => catalog_repo::get_exercise_by_id(db, source_id, user_id)
            .await?
            .map(|e| e.updated_at),
    }
    .ok_or_else(|| AppError::not_found("source item not found"))?;

    repo::upsert_ignored_update(db, user_id, kind, source_id, updated_at).await?;
    info!(%user_id, kind = kind.as_str(), %source_id, "review item ignored");
    Ok(())
}
