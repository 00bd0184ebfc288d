//! Structured diff between two content snapshots.
//!
//! Scalar fields are compared structurally in a fixed declaration order so
//! output is deterministic. Blocks are compared positionally: index `i` in
//! the old list against index `i` in the new list, with surplus entries on
//! either side reported as added or removed. This is an O(n) comparison
//! intended for human review of short block lists; a whole-list reorder is
//! reported as every position modified, not as a move. True move detection
//! would need an edit-distance or keyed diff, which this engine does not do.

use serde::Serialize;

use crate::content::Block;
use crate::snapshot::Snapshot;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Change-set types
// ---------------------------------------------------------------------------

/// One scalar/structured field that differs between two snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: serde_json::Value,
    pub new: serde_json::Value,
}

/// A block present at the same index on both sides but structurally unequal.
#[derive(Debug, Clone, Serialize)]
pub struct BlockModified {
    pub index: usize,
    pub old_block: Block,
    pub new_block: Block,
}

/// A block present on only one side, with its position in that side's list.
#[derive(Debug, Clone, Serialize)]
pub struct BlockEntry {
    pub index: usize,
    pub block: Block,
}

/// Positional comparison result for the ordered block lists.
#[derive(Debug, Clone, Serialize)]
pub struct BlockChangeSet {
    pub has_changes: bool,
    pub modified: Vec<BlockModified>,
    pub added: Vec<BlockEntry>,
    pub removed: Vec<BlockEntry>,
}

/// Full comparison result between two snapshots.
///
/// `new_revision_id = None` on a persisted-vs-live comparison means the
/// "new" side is the current live state rather than a stored revision.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSet {
    pub has_changes: bool,
    pub old_revision_id: Option<DbId>,
    pub new_revision_id: Option<DbId>,
    pub field_changes: Vec<FieldChange>,
    pub block_changes: BlockChangeSet,
}

// ---------------------------------------------------------------------------
// Diff computation
// ---------------------------------------------------------------------------

/// Compare two snapshots field by field.
///
/// Revision ids on the returned change set are `None`; callers that load
/// snapshots from stored revisions fill them in.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    let mut field_changes = Vec::new();

    compare_field(&mut field_changes, "title", &old.title, &new.title);
    compare_field(&mut field_changes, "slug", &old.slug, &new.slug);
    compare_field(&mut field_changes, "excerpt", &old.excerpt, &new.excerpt);
    compare_field(&mut field_changes, "body", &old.body, &new.body);
    compare_field(&mut field_changes, "seo", &old.seo, &new.seo);
    compare_field(&mut field_changes, "status", &old.status, &new.status);
    compare_field(
        &mut field_changes,
        "published_at",
        &old.published_at,
        &new.published_at,
    );
    compare_field(
        &mut field_changes,
        "scheduled_at",
        &old.scheduled_at,
        &new.scheduled_at,
    );
    compare_field(
        &mut field_changes,
        "category_id",
        &old.category_id,
        &new.category_id,
    );
    compare_field(
        &mut field_changes,
        "locale_id",
        &old.locale_id,
        &new.locale_id,
    );
    compare_field(
        &mut field_changes,
        "author_id",
        &old.author_id,
        &new.author_id,
    );
    compare_field(
        &mut field_changes,
        "cover_image_id",
        &old.cover_image_id,
        &new.cover_image_id,
    );
    compare_field(&mut field_changes, "tag_ids", &old.tag_ids, &new.tag_ids);

    let block_changes = diff_blocks(&old.blocks, &new.blocks);
    let has_changes = !field_changes.is_empty() || block_changes.has_changes;

    ChangeSet {
        has_changes,
        old_revision_id: None,
        new_revision_id: None,
        field_changes,
        block_changes,
    }
}

/// Positional comparison of two ordered block lists.
pub fn diff_blocks(old: &[Block], new: &[Block]) -> BlockChangeSet {
    let shared = old.len().min(new.len());

    let mut modified = Vec::new();
    for i in 0..shared {
        if old[i] != new[i] {
            modified.push(BlockModified {
                index: i,
                old_block: old[i].clone(),
                new_block: new[i].clone(),
            });
        }
    }

    let added: Vec<BlockEntry> = new[shared..]
        .iter()
        .enumerate()
        .map(|(offset, block)| BlockEntry {
            index: shared + offset,
            block: block.clone(),
        })
        .collect();

    let removed: Vec<BlockEntry> = old[shared..]
        .iter()
        .enumerate()
        .map(|(offset, block)| BlockEntry {
            index: shared + offset,
            block: block.clone(),
        })
        .collect();

    let has_changes = !modified.is_empty() || !added.is_empty() || !removed.is_empty();

    BlockChangeSet {
        has_changes,
        modified,
        added,
        removed,
    }
}

fn compare_field<T: PartialEq + Serialize>(
    out: &mut Vec<FieldChange>,
    field: &'static str,
    old: &T,
    new: &T,
) {
    if old != new {
        out.push(FieldChange {
            field,
            old: serde_json::to_value(old).unwrap_or(serde_json::Value::Null),
            new: serde_json::to_value(new).unwrap_or(serde_json::Value::Null),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStatus;
    use serde_json::json;

    fn snapshot_with_blocks(blocks: Vec<Block>) -> Snapshot {
        Snapshot {
            title: "Title".to_string(),
            slug: "title".to_string(),
            excerpt: None,
            body: None,
            blocks,
            seo: json!({}),
            status: ContentStatus::Draft,
            published_at: None,
            scheduled_at: None,
            category_id: None,
            locale_id: None,
            author_id: None,
            cover_image_id: None,
            tag_ids: Vec::new(),
        }
    }

    fn block(name: &str) -> Block {
        Block::new("paragraph", json!({"text": name}))
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let snap = snapshot_with_blocks(vec![block("a"), block("b")]);
        let changes = diff_snapshots(&snap, &snap.clone());
        assert!(!changes.has_changes);
        assert!(changes.field_changes.is_empty());
        assert!(!changes.block_changes.has_changes);
        assert!(changes.block_changes.modified.is_empty());
        assert!(changes.block_changes.added.is_empty());
        assert!(changes.block_changes.removed.is_empty());
    }

    #[test]
    fn scalar_changes_are_reported_in_declaration_order() {
        let old = snapshot_with_blocks(Vec::new());
        let mut new = old.clone();
        new.title = "Renamed".to_string();
        new.status = ContentStatus::Published;
        new.author_id = Some(9);

        let changes = diff_snapshots(&old, &new);
        assert!(changes.has_changes);

        let fields: Vec<&str> = changes.field_changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["title", "status", "author_id"]);

        let title_change = &changes.field_changes[0];
        assert_eq!(title_change.old, json!("Title"));
        assert_eq!(title_change.new, json!("Renamed"));
    }

    #[test]
    fn appended_blocks_are_added_at_their_new_positions() {
        let old = vec![block("a"), block("b"), block("c"), block("d")];
        let mut new = old.clone();
        new.push(block("e"));
        new.push(block("f"));

        let changes = diff_blocks(&old, &new);
        assert!(changes.has_changes);
        assert!(changes.modified.is_empty());
        assert!(changes.removed.is_empty());
        assert_eq!(changes.added.len(), 2);
        assert_eq!(changes.added[0].index, 4);
        assert_eq!(changes.added[0].block, block("e"));
        assert_eq!(changes.added[1].index, 5);
        assert_eq!(changes.added[1].block, block("f"));
    }

    #[test]
    fn truncated_blocks_are_removed_at_their_old_positions() {
        let old = vec![block("a"), block("b"), block("c"), block("d")];
        let new = vec![block("a"), block("b")];

        let changes = diff_blocks(&old, &new);
        assert!(changes.has_changes);
        assert!(changes.modified.is_empty());
        assert!(changes.added.is_empty());
        assert_eq!(changes.removed.len(), 2);
        assert_eq!(changes.removed[0].index, 2);
        assert_eq!(changes.removed[0].block, block("c"));
        assert_eq!(changes.removed[1].index, 3);
        assert_eq!(changes.removed[1].block, block("d"));
    }

    #[test]
    fn full_reversal_reports_every_position_modified() {
        let old = vec![block("a"), block("b"), block("c"), block("d")];
        let new: Vec<Block> = old.iter().rev().cloned().collect();

        let changes = diff_blocks(&old, &new);
        assert!(changes.has_changes);
        assert!(changes.added.is_empty());
        assert!(changes.removed.is_empty());
        assert_eq!(changes.modified.len(), 4);
        for (i, entry) in changes.modified.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(entry.old_block, old[i]);
            assert_eq!(entry.new_block, new[i]);
        }
    }

    #[test]
    fn modified_and_added_can_coexist() {
        let old = vec![block("a"), block("b")];
        let new = vec![block("a"), block("changed"), block("c")];

        let changes = diff_blocks(&old, &new);
        assert_eq!(changes.modified.len(), 1);
        assert_eq!(changes.modified[0].index, 1);
        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].index, 2);
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn type_change_alone_is_a_modification() {
        let old = vec![Block::new("paragraph", json!({"text": "x"}))];
        let new = vec![Block::new("quote", json!({"text": "x"}))];

        let changes = diff_blocks(&old, &new);
        assert_eq!(changes.modified.len(), 1);
    }

    #[test]
    fn block_changes_alone_set_has_changes() {
        let old = snapshot_with_blocks(vec![block("a")]);
        let new = snapshot_with_blocks(vec![block("b")]);

        let changes = diff_snapshots(&old, &new);
        assert!(changes.has_changes);
        assert!(changes.field_changes.is_empty());
        assert!(changes.block_changes.has_changes);
    }

    #[test]
    fn empty_block_lists_compare_equal() {
        let changes = diff_blocks(&[], &[]);
        assert!(!changes.has_changes);
    }
}
