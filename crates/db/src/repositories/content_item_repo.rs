//! Repository for the `content_items` table.
//!
//! The revisioning core treats content items as an external collaborator:
//! this repo covers only the boundary it needs, creating rows for the
//! mutation path and tests, and loading rows for capture and diff. The
//! restore-time row update lives in the restore coordinator so it commits
//! inside the restore transaction.

use sqlx::PgPool;

use inkstone_core::types::DbId;

use crate::error::StoreError;
use crate::models::content_item::{ContentItem, CreateContentItem};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, title, slug, excerpt, body, blocks, seo, status, \
    published_at, scheduled_at, category_id, locale_id, author_id, cover_image_id, \
    tag_ids, created_at, updated_at";

/// Provides the content-entity boundary operations used by the core.
pub struct ContentItemRepo;

impl ContentItemRepo {
    /// Insert a new content item.
    pub async fn create(
        pool: &PgPool,
        input: &CreateContentItem,
    ) -> Result<ContentItem, StoreError> {
        let query = format!(
            "INSERT INTO content_items
                (title, slug, excerpt, body, blocks, seo, status, published_at,
                 scheduled_at, category_id, locale_id, author_id, cover_image_id, tag_ids)
             VALUES (
                $1, $2, $3, $4,
                COALESCE($5, '[]'::jsonb),
                COALESCE($6, '{{}}'::jsonb),
                COALESCE($7, 'draft'),
                $8, $9, $10, $11, $12, $13,
                COALESCE($14, '{{}}'::bigint[])
             )
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, ContentItem>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.body)
            .bind(&input.blocks)
            .bind(&input.seo)
            .bind(&input.status)
            .bind(input.published_at)
            .bind(input.scheduled_at)
            .bind(input.category_id)
            .bind(input.locale_id)
            .bind(input.author_id)
            .bind(input.cover_image_id)
            .bind(&input.tag_ids)
            .fetch_one(pool)
            .await?;
        Ok(item)
    }

    /// Find a content item by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentItem>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM content_items WHERE id = $1");
        let item = sqlx::query_as::<_, ContentItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(item)
    }

    /// Find a content item by id, failing with `NotFound` if absent.
    pub async fn get_required(pool: &PgPool, id: DbId) -> Result<ContentItem, StoreError> {
        Self::find_by_id(pool, id).await?.ok_or(StoreError::NotFound {
            entity: "content_item",
            id,
        })
    }
}
