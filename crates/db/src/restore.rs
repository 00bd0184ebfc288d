//! Restore coordinator: applies a stored revision back onto the live
//! content item.
//!
//! The whole restore (pre-restore backup, field overwrite, audit entry)
//! runs in one transaction. A failure at any step rolls everything back,
//! so the backup can never exist without the restore having applied, or
//! vice versa. The restored item always comes back as a draft; re-publishing
//! is a separate, explicit operation.

use sqlx::PgPool;

use inkstone_core::audit::{action_types, entity_types, META_REVERTED_TO_REVISION_ID};
use inkstone_core::snapshot::{apply_snapshot, Versionable};
use inkstone_core::types::DbId;

use crate::error::StoreError;
use crate::models::audit::CreateAuditLog;
use crate::models::content_item::ContentItem;
use crate::repositories::audit_repo::AuditLogRepo;
use crate::repositories::content_item_repo;
use crate::repositories::revision_repo::{self, RevisionRepo};

/// Options for a restore call.
#[derive(Debug, Clone)]
pub struct RestoreOptions {
    /// Snapshot the current live state as a backup revision before
    /// overwriting it. On by default; the pre-restore state is then never
    /// lost even if the restore itself is later regretted.
    pub create_backup: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            create_backup: true,
            ip_address: None,
            user_agent: None,
        }
    }
}

/// Coordinates the multi-step restore of a content item to a prior revision.
pub struct RestoreCoordinator;

impl RestoreCoordinator {
    /// Restore the content item owning `revision_id` to that revision's
    /// snapshot. Returns the mutated item. Never deletes any revision.
    pub async fn restore(
        pool: &PgPool,
        revision_id: DbId,
        actor: Option<DbId>,
        options: &RestoreOptions,
    ) -> Result<ContentItem, StoreError> {
        let revision = RevisionRepo::get_required(pool, revision_id).await?;
        let snapshot = revision.decode_snapshot()?;

        let mut tx = pool.begin().await?;

        let item_query = format!(
            "SELECT {} FROM content_items WHERE id = $1",
            content_item_repo::COLUMNS
        );
        let mut item = sqlx::query_as::<_, ContentItem>(&item_query)
            .bind(revision.content_item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "content_item",
                id: revision.content_item_id,
            })?;

        if options.create_backup {
            let backup = serde_json::to_value(item.capture())?;
            let backup_query = format!(
                "INSERT INTO revisions
                    (content_item_id, snapshot, created_by, is_published_snapshot, is_autosave, comment)
                 VALUES ($1, $2, $3, false, false, $4)
                 RETURNING {}",
                revision_repo::COLUMNS
            );
            sqlx::query_as::<_, crate::models::revision::Revision>(&backup_query)
                .bind(item.id)
                .bind(&backup)
                .bind(actor)
                .bind(format!(
                    "Automatic backup before restoring revision {revision_id}"
                ))
                .fetch_one(&mut *tx)
                .await?;
        }

        // Overwrite the versioned fields; status is forced back to draft
        // and the published timestamp cleared.
        apply_snapshot(&mut item, &snapshot);

        // Restored tag ids that no longer exist are silently dropped.
        if !item.tag_ids.is_empty() {
            let existing: Vec<DbId> = sqlx::query_scalar("SELECT id FROM tags WHERE id = ANY($1)")
                .bind(&item.tag_ids)
                .fetch_all(&mut *tx)
                .await?;
            item.tag_ids.retain(|id| existing.contains(id));
        }

        let update_query = format!(
            "UPDATE content_items SET
                title = $2, slug = $3, excerpt = $4, body = $5, blocks = $6, seo = $7,
                status = $8, published_at = $9, scheduled_at = $10, category_id = $11,
                locale_id = $12, author_id = $13, cover_image_id = $14, tag_ids = $15,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            content_item_repo::COLUMNS
        );
        let updated = sqlx::query_as::<_, ContentItem>(&update_query)
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.slug)
            .bind(&item.excerpt)
            .bind(&item.body)
            .bind(&item.blocks)
            .bind(&item.seo)
            .bind(&item.status)
            .bind(item.published_at)
            .bind(item.scheduled_at)
            .bind(item.category_id)
            .bind(item.locale_id)
            .bind(item.author_id)
            .bind(item.cover_image_id)
            .bind(&item.tag_ids)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::insert_in_tx(
            &mut tx,
            &CreateAuditLog {
                user_id: actor,
                action_type: action_types::REVERT.to_string(),
                entity_type: Some(entity_types::CONTENT_ITEM.to_string()),
                entity_id: Some(updated.id),
                details_json: Some(serde_json::json!({
                    META_REVERTED_TO_REVISION_ID: revision_id,
                })),
                ip_address: options.ip_address.clone(),
                user_agent: options.user_agent.clone(),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            content_item_id = updated.id,
            revision_id,
            backup = options.create_backup,
            "restored content item to revision"
        );

        Ok(updated)
    }
}
