//! Revision entity model and DTOs.
//!
//! Revisions are immutable snapshots of content item state, created on
//! every save. There is deliberately no update DTO: a revision row never
//! changes after insert and is removed only by retention pruning or
//! explicit deletion.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use inkstone_core::snapshot::Snapshot;
use inkstone_core::types::{DbId, Timestamp};

/// A row from the `revisions` table. Immutable once created.
///
/// The two flags are independent: a revision can be both a published
/// snapshot and an autosave, either, or neither (a manual save).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Revision {
    pub id: DbId,
    pub content_item_id: DbId,
    /// The captured snapshot, stored as JSONB.
    pub snapshot: serde_json::Value,
    /// Actor who created the revision; `None` for system-generated ones.
    pub created_by: Option<DbId>,
    pub is_published_snapshot: bool,
    pub is_autosave: bool,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

impl Revision {
    /// Deserialize the stored snapshot value.
    pub fn decode_snapshot(&self) -> Result<Snapshot, serde_json::Error> {
        serde_json::from_value(self.snapshot.clone())
    }
}

/// DTO for inserting a new revision.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRevision {
    pub content_item_id: DbId,
    pub snapshot: serde_json::Value,
    pub created_by: Option<DbId>,
    pub is_published_snapshot: bool,
    pub is_autosave: bool,
    pub comment: Option<String>,
}

/// Filter parameters for listing a content item's revisions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevisionQuery {
    pub is_published_snapshot: Option<bool>,
    pub is_autosave: Option<bool>,
    pub created_by: Option<DbId>,
    /// Case-insensitive substring match on the comment.
    pub comment_contains: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
