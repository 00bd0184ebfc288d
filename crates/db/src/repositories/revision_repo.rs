//! Repository for the `revisions` table.
//!
//! Revisions are append-only: there is no update operation, and deletion
//! happens only through the retention pruner or an explicit caller request.
//! Per content item the rows are totally ordered by `(created_at, id)`
//! descending; the BIGSERIAL id breaks same-microsecond ties.

use sqlx::PgPool;

use inkstone_core::content::validate_comment;
use inkstone_core::retention::DEFAULT_AUTOSAVE_KEEP;
use inkstone_core::snapshot::Versionable;
use inkstone_core::types::DbId;

use crate::error::StoreError;
use crate::models::revision::{CreateRevision, Revision, RevisionQuery};
use crate::retention::RetentionPruner;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, content_item_id, snapshot, created_by, \
    is_published_snapshot, is_autosave, comment, created_at";

/// Upper bound on page size for list queries.
const MAX_PAGE_SIZE: i64 = 500;

/// Provides append/list/get/delete operations for revisions.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Append a new revision.
    ///
    /// If the revision is an autosave, the autosave retention prune runs
    /// for the same content item immediately afterwards, keeping only the
    /// most recent [`DEFAULT_AUTOSAVE_KEEP`] autosaves.
    pub async fn append(pool: &PgPool, input: &CreateRevision) -> Result<Revision, StoreError> {
        if let Some(comment) = &input.comment {
            validate_comment(comment)?;
        }

        let query = format!(
            "INSERT INTO revisions
                (content_item_id, snapshot, created_by, is_published_snapshot, is_autosave, comment)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let revision = sqlx::query_as::<_, Revision>(&query)
            .bind(input.content_item_id)
            .bind(&input.snapshot)
            .bind(input.created_by)
            .bind(input.is_published_snapshot)
            .bind(input.is_autosave)
            .bind(&input.comment)
            .fetch_one(pool)
            .await?;

        if input.is_autosave {
            let pruned = RetentionPruner::prune_autosaves(
                pool,
                input.content_item_id,
                DEFAULT_AUTOSAVE_KEEP,
            )
            .await?;
            if pruned > 0 {
                tracing::debug!(
                    content_item_id = input.content_item_id,
                    pruned,
                    "pruned superseded autosaves after append"
                );
            }
        }

        Ok(revision)
    }

    /// Capture an entity's current state and append it as a revision.
    pub async fn create_for_entity<T: Versionable + Sync>(
        pool: &PgPool,
        entity: &T,
        created_by: Option<DbId>,
        is_published_snapshot: bool,
        is_autosave: bool,
        comment: Option<String>,
    ) -> Result<Revision, StoreError> {
        let snapshot = serde_json::to_value(entity.capture())?;
        Self::append(
            pool,
            &CreateRevision {
                content_item_id: entity.identity(),
                snapshot,
                created_by,
                is_published_snapshot,
                is_autosave,
                comment,
            },
        )
        .await
    }

    /// List a content item's revisions, newest first.
    pub async fn list(
        pool: &PgPool,
        content_item_id: DbId,
        params: &RevisionQuery,
    ) -> Result<Vec<Revision>, StoreError> {
        let (filter_clause, bind_values) = build_revision_filter(params);

        let limit = params.limit.unwrap_or(100).clamp(0, MAX_PAGE_SIZE);
        let offset = params.offset.unwrap_or(0).max(0);
        let limit_idx = bind_values.len() + 2;
        let offset_idx = bind_values.len() + 3;

        let query = format!(
            "SELECT {COLUMNS} FROM revisions
             WHERE content_item_id = $1{filter_clause}
             ORDER BY created_at DESC, id DESC
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );

        let mut q = sqlx::query_as::<_, Revision>(&query).bind(content_item_id);
        for val in &bind_values {
            match val {
                BindValue::Bool(v) => q = q.bind(*v),
                BindValue::BigInt(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
            }
        }
        q = q.bind(limit).bind(offset);

        let revisions = q.fetch_all(pool).await?;
        Ok(revisions)
    }

    /// Find a revision by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Revision>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM revisions WHERE id = $1");
        let revision = sqlx::query_as::<_, Revision>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(revision)
    }

    /// Find a revision by id, failing with `NotFound` if absent.
    pub async fn get_required(pool: &PgPool, id: DbId) -> Result<Revision, StoreError> {
        Self::find_by_id(pool, id).await?.ok_or(StoreError::NotFound {
            entity: "revision",
            id,
        })
    }

    /// Find the newest revision flagged as a published snapshot.
    ///
    /// Publish flows use this to decide whether to reuse the latest
    /// published snapshot or create a new one; the store itself does not
    /// enforce uniqueness of the flag.
    pub async fn find_latest_published(
        pool: &PgPool,
        content_item_id: DbId,
    ) -> Result<Option<Revision>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM revisions
             WHERE content_item_id = $1 AND is_published_snapshot = true
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        let revision = sqlx::query_as::<_, Revision>(&query)
            .bind(content_item_id)
            .fetch_optional(pool)
            .await?;
        Ok(revision)
    }

    /// Hard-delete a revision. Returns `false` if the id did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM revisions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distinct ids of content items that have at least one revision.
    /// Used by the retention sweep to enumerate prune targets.
    pub async fn content_item_ids(pool: &PgPool) -> Result<Vec<DbId>, StoreError> {
        let ids: Vec<DbId> =
            sqlx::query_scalar("SELECT DISTINCT content_item_id FROM revisions ORDER BY content_item_id")
                .fetch_all(pool)
                .await?;
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built revision queries.
enum BindValue {
    Bool(bool),
    BigInt(i64),
    Text(String),
}

/// Build additional AND conditions and bind values from `RevisionQuery`
/// filter parameters. `$1` is always the content item id.
fn build_revision_filter(params: &RevisionQuery) -> (String, Vec<BindValue>) {
    let mut conditions = String::new();
    let mut bind_idx = 2u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(flag) = params.is_published_snapshot {
        conditions.push_str(&format!(" AND is_published_snapshot = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(flag));
    }

    if let Some(flag) = params.is_autosave {
        conditions.push_str(&format!(" AND is_autosave = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(flag));
    }

    if let Some(created_by) = params.created_by {
        conditions.push_str(&format!(" AND created_by = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(created_by));
    }

    if let Some(ref fragment) = params.comment_contains {
        conditions.push_str(&format!(" AND comment ILIKE ${bind_idx}"));
        let _ = bind_idx;
        bind_values.push(BindValue::Text(format!(
            "%{}%",
            crate::repositories::escape_like(fragment)
        )));
    }

    (conditions, bind_values)
}
