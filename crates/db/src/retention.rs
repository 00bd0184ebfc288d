//! Retention pruner: hard-deletes superseded revisions per policy.
//!
//! Each prune is a single DELETE statement, so one entity's batch either
//! deletes entirely or not at all, and revisions created after the
//! statement's snapshot of the data can never be collected by it. Both
//! operations are idempotent. Revisions flagged as published snapshots are
//! never deleted, regardless of age or autosave status.

use sqlx::PgPool;

use inkstone_core::retention::{age_cutoff, validate_age_days, validate_keep_count};
use inkstone_core::types::DbId;

use crate::error::StoreError;

/// Deletes superseded autosave and aged revisions.
pub struct RetentionPruner;

impl RetentionPruner {
    /// Keep the `keep` most recent autosave revisions for a content item
    /// and hard-delete the rest. Published-flagged rows survive even when
    /// also flagged autosave. Returns the number of deleted rows.
    pub async fn prune_autosaves(
        pool: &PgPool,
        content_item_id: DbId,
        keep: i64,
    ) -> Result<u64, StoreError> {
        validate_keep_count(keep)?;

        let result = sqlx::query(
            "DELETE FROM revisions
             WHERE content_item_id = $1
               AND is_autosave = true
               AND is_published_snapshot = false
               AND id NOT IN (
                   SELECT id FROM revisions
                   WHERE content_item_id = $1 AND is_autosave = true
                   ORDER BY created_at DESC, id DESC
                   LIMIT $2
               )",
        )
        .bind(content_item_id)
        .bind(keep)
        .execute(pool)
        .await?;

        let pruned = result.rows_affected();
        if pruned > 0 {
            tracing::debug!(content_item_id, keep, pruned, "pruned autosave revisions");
        }
        Ok(pruned)
    }

    /// Hard-delete a content item's revisions older than the cutoff,
    /// except published snapshots, which are retained indefinitely.
    /// Returns the number of deleted rows.
    pub async fn prune_by_age(
        pool: &PgPool,
        content_item_id: DbId,
        older_than_days: i64,
    ) -> Result<u64, StoreError> {
        validate_age_days(older_than_days)?;
        let cutoff = age_cutoff(older_than_days);

        let result = sqlx::query(
            "DELETE FROM revisions
             WHERE content_item_id = $1
               AND is_published_snapshot = false
               AND created_at < $2",
        )
        .bind(content_item_id)
        .bind(cutoff)
        .execute(pool)
        .await?;

        let pruned = result.rows_affected();
        if pruned > 0 {
            tracing::debug!(
                content_item_id,
                older_than_days,
                pruned,
                "pruned aged revisions"
            );
        }
        Ok(pruned)
    }
}
