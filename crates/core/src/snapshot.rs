//! Snapshot value object and the capture/apply codec.
//!
//! A snapshot is a flat, self-contained copy of every versioned field of a
//! content item at one instant. Foreign references are captured as bare
//! identifiers (not live rows) so a snapshot stays restorable even after a
//! referenced category, locale, or author disappears.

use serde::{Deserialize, Serialize};

use crate::content::{Block, ContentStatus};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Immutable flattened copy of a content item's versioned fields.
///
/// Serialized to JSONB for storage inside a revision row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub blocks: Vec<Block>,
    /// SEO metadata map (arbitrary JSON object).
    #[serde(default)]
    pub seo: serde_json::Value,
    pub status: ContentStatus,
    pub published_at: Option<Timestamp>,
    pub scheduled_at: Option<Timestamp>,
    pub category_id: Option<DbId>,
    pub locale_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub cover_image_id: Option<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Versionable
// ---------------------------------------------------------------------------

/// Interface a content-entity type satisfies to participate in revisioning.
pub trait Versionable {
    /// Stable identity of the entity.
    fn identity(&self) -> DbId;

    /// Read the entity's versioned fields into a flat snapshot.
    ///
    /// Must not fail for any valid entity state.
    fn capture(&self) -> Snapshot;

    /// Overwrite exactly the versioned fields from a snapshot, verbatim.
    ///
    /// Implementations write what they are given; restore policy (draft
    /// forcing) is applied by [`apply_snapshot`] before this is called.
    fn write_fields(&mut self, snapshot: &Snapshot);
}

/// Apply a snapshot onto a live entity, forcing it back to draft.
///
/// The stored status and published timestamp are deliberately discarded:
/// restoring history never re-publishes automatically. An operator must
/// review the restored draft and re-publish explicitly.
pub fn apply_snapshot<T: Versionable>(entity: &mut T, snapshot: &Snapshot) {
    let mut restored = snapshot.clone();
    restored.status = ContentStatus::Draft;
    restored.published_at = None;
    entity.write_fields(&restored);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    /// Minimal in-memory entity for exercising the codec without a database.
    #[derive(Debug, Clone, PartialEq)]
    struct TestPage {
        id: DbId,
        title: String,
        slug: String,
        excerpt: Option<String>,
        body: Option<String>,
        blocks: Vec<Block>,
        seo: serde_json::Value,
        status: ContentStatus,
        published_at: Option<Timestamp>,
        scheduled_at: Option<Timestamp>,
        category_id: Option<DbId>,
        locale_id: Option<DbId>,
        author_id: Option<DbId>,
        cover_image_id: Option<DbId>,
        tag_ids: Vec<DbId>,
    }

    impl Versionable for TestPage {
        fn identity(&self) -> DbId {
            self.id
        }

        fn capture(&self) -> Snapshot {
            Snapshot {
                title: self.title.clone(),
                slug: self.slug.clone(),
                excerpt: self.excerpt.clone(),
                body: self.body.clone(),
                blocks: self.blocks.clone(),
                seo: self.seo.clone(),
                status: self.status,
                published_at: self.published_at,
                scheduled_at: self.scheduled_at,
                category_id: self.category_id,
                locale_id: self.locale_id,
                author_id: self.author_id,
                cover_image_id: self.cover_image_id,
                tag_ids: self.tag_ids.clone(),
            }
        }

        fn write_fields(&mut self, snapshot: &Snapshot) {
            self.title = snapshot.title.clone();
            self.slug = snapshot.slug.clone();
            self.excerpt = snapshot.excerpt.clone();
            self.body = snapshot.body.clone();
            self.blocks = snapshot.blocks.clone();
            self.seo = snapshot.seo.clone();
            self.status = snapshot.status;
            self.published_at = snapshot.published_at;
            self.scheduled_at = snapshot.scheduled_at;
            self.category_id = snapshot.category_id;
            self.locale_id = snapshot.locale_id;
            self.author_id = snapshot.author_id;
            self.cover_image_id = snapshot.cover_image_id;
            self.tag_ids = snapshot.tag_ids.clone();
        }
    }

    fn published_page() -> TestPage {
        TestPage {
            id: 7,
            title: "Launch announcement".to_string(),
            slug: "launch-announcement".to_string(),
            excerpt: Some("We are live".to_string()),
            body: Some("Full text".to_string()),
            blocks: vec![
                Block::new("heading", json!({"level": 1, "text": "Launch"})),
                Block::new("paragraph", json!({"text": "We are live."})),
            ],
            seo: json!({"og:title": "Launch"}),
            status: ContentStatus::Published,
            published_at: Some(Utc::now()),
            scheduled_at: None,
            category_id: Some(3),
            locale_id: Some(1),
            author_id: Some(42),
            cover_image_id: Some(99),
            tag_ids: vec![2, 5],
        }
    }

    fn blank_page(id: DbId) -> TestPage {
        TestPage {
            id,
            title: String::new(),
            slug: String::new(),
            excerpt: None,
            body: None,
            blocks: Vec::new(),
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

    #[test]
    fn capture_then_apply_round_trips_except_publish_state() {
        let page = published_page();
        let snapshot = page.capture();

        let mut fresh = blank_page(page.id);
        apply_snapshot(&mut fresh, &snapshot);

        // Everything matches except the forced publish state.
        assert_eq!(fresh.title, page.title);
        assert_eq!(fresh.slug, page.slug);
        assert_eq!(fresh.excerpt, page.excerpt);
        assert_eq!(fresh.body, page.body);
        assert_eq!(fresh.blocks, page.blocks);
        assert_eq!(fresh.seo, page.seo);
        assert_eq!(fresh.scheduled_at, page.scheduled_at);
        assert_eq!(fresh.category_id, page.category_id);
        assert_eq!(fresh.locale_id, page.locale_id);
        assert_eq!(fresh.author_id, page.author_id);
        assert_eq!(fresh.cover_image_id, page.cover_image_id);
        assert_eq!(fresh.tag_ids, page.tag_ids);

        assert_eq!(fresh.status, ContentStatus::Draft);
        assert_eq!(fresh.published_at, None);
    }

    #[test]
    fn apply_does_not_mutate_the_snapshot() {
        let page = published_page();
        let snapshot = page.capture();
        let before = snapshot.clone();

        let mut fresh = blank_page(page.id);
        apply_snapshot(&mut fresh, &snapshot);

        assert_eq!(snapshot, before);
        assert_eq!(snapshot.status, ContentStatus::Published);
    }

    #[test]
    fn capture_handles_minimal_entity_state() {
        let page = blank_page(1);
        let snapshot = page.capture();
        assert_eq!(snapshot.title, "");
        assert!(snapshot.blocks.is_empty());
        assert_eq!(snapshot.status, ContentStatus::Draft);
    }

    #[test]
    fn snapshot_json_round_trips() {
        let snapshot = published_page().capture();
        let value = serde_json::to_value(&snapshot).unwrap();
        let decoded: Snapshot = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn snapshot_decodes_with_missing_optional_collections() {
        // Older stored snapshots may predate the seo/tag fields.
        let value = json!({
            "title": "T",
            "slug": "t",
            "excerpt": null,
            "body": null,
            "blocks": [],
            "status": "draft",
            "published_at": null,
            "scheduled_at": null,
            "category_id": null,
            "locale_id": null,
            "author_id": null,
            "cover_image_id": null
        });
        let decoded: Snapshot = serde_json::from_value(value).unwrap();
        assert!(decoded.tag_ids.is_empty());
        assert!(decoded.seo.is_null());
    }
}
