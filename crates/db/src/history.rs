//! Diff operations over stored revisions.
//!
//! Composes the revision repository with the pure diff engine from
//! `inkstone_core::diff`.

use sqlx::PgPool;

use inkstone_core::diff::{diff_snapshots, ChangeSet};
use inkstone_core::snapshot::Versionable;
use inkstone_core::types::DbId;

use crate::error::StoreError;
use crate::repositories::{ContentItemRepo, RevisionRepo};

/// Loads revisions and computes change sets between them.
pub struct RevisionDiff;

impl RevisionDiff {
    /// Diff two stored revisions. The change set carries both revision ids.
    pub async fn between(
        pool: &PgPool,
        old_revision_id: DbId,
        new_revision_id: DbId,
    ) -> Result<ChangeSet, StoreError> {
        let old = RevisionRepo::get_required(pool, old_revision_id).await?;
        let new = RevisionRepo::get_required(pool, new_revision_id).await?;

        let mut changes = diff_snapshots(&old.decode_snapshot()?, &new.decode_snapshot()?);
        changes.old_revision_id = Some(old.id);
        changes.new_revision_id = Some(new.id);
        Ok(changes)
    }

    /// Diff a stored revision against the current live state of its
    /// content item, captured fresh at call time.
    ///
    /// `new_revision_id` is `None` in the result to signal that the "new"
    /// side is the live entity, not a persisted revision.
    pub async fn against_live(
        pool: &PgPool,
        revision_id: DbId,
    ) -> Result<ChangeSet, StoreError> {
        let revision = RevisionRepo::get_required(pool, revision_id).await?;
        let item = ContentItemRepo::get_required(pool, revision.content_item_id).await?;

        let mut changes = diff_snapshots(&revision.decode_snapshot()?, &item.capture());
        changes.old_revision_id = Some(revision.id);
        changes.new_revision_id = None;
        Ok(changes)
    }
}
