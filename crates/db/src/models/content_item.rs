//! Content item model: the live, mutable entity being versioned.
//!
//! The revisioning core only reads these rows and, during restore,
//! overwrites the versioned subset of fields. Business validation (slug
//! uniqueness and the like) belongs to the surrounding CMS module.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use inkstone_core::content::{Block, ContentStatus};
use inkstone_core::snapshot::{Snapshot, Versionable};
use inkstone_core::types::{DbId, Timestamp};

/// A row from the `content_items` table.
///
/// `category_id`, `locale_id`, `author_id`, and `cover_image_id` are plain
/// identifiers without FK enforcement so that restored snapshots survive
/// deletion of the rows they reference.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentItem {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    /// Ordered block list, stored as a JSONB array.
    pub blocks: serde_json::Value,
    /// SEO metadata map, stored as a JSONB object.
    pub seo: serde_json::Value,
    pub status: String,
    pub published_at: Option<Timestamp>,
    pub scheduled_at: Option<Timestamp>,
    pub category_id: Option<DbId>,
    pub locale_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub cover_image_id: Option<DbId>,
    pub tag_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContentItem {
    /// Decode the stored block list. Malformed stored data decodes as an
    /// empty list so capture never fails on a valid row.
    pub fn decoded_blocks(&self) -> Vec<Block> {
        serde_json::from_value(self.blocks.clone()).unwrap_or_default()
    }
}

impl Versionable for ContentItem {
    fn identity(&self) -> DbId {
        self.id
    }

    fn capture(&self) -> Snapshot {
        Snapshot {
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            body: self.body.clone(),
            blocks: self.decoded_blocks(),
            seo: self.seo.clone(),
            status: ContentStatus::parse(&self.status),
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
        self.blocks = serde_json::to_value(&snapshot.blocks)
            .unwrap_or_else(|_| serde_json::Value::Array(Vec::new()));
        self.seo = snapshot.seo.clone();
        self.status = snapshot.status.as_str().to_string();
        self.published_at = snapshot.published_at;
        self.scheduled_at = snapshot.scheduled_at;
        self.category_id = snapshot.category_id;
        self.locale_id = snapshot.locale_id;
        self.author_id = snapshot.author_id;
        self.cover_image_id = snapshot.cover_image_id;
        self.tag_ids = snapshot.tag_ids.clone();
    }
}

/// DTO for inserting a new content item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentItem {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub blocks: Option<serde_json::Value>,
    pub seo: Option<serde_json::Value>,
    pub status: Option<String>,
    pub published_at: Option<Timestamp>,
    pub scheduled_at: Option<Timestamp>,
    pub category_id: Option<DbId>,
    pub locale_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub cover_image_id: Option<DbId>,
    pub tag_ids: Option<Vec<DbId>>,
}
