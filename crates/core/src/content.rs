//! Content entity value types shared between the codec, diff engine, and
//! repository layer: lifecycle status, body blocks, and input validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Lifecycle status constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_ARCHIVED: &str = "archived";

/// All valid content lifecycle statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_PUBLISHED,
    STATUS_SCHEDULED,
    STATUS_ARCHIVED,
];

// ---------------------------------------------------------------------------
// ContentStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a content item.
///
/// Stored as TEXT in the database; unknown stored values decode as `Draft`
/// so that snapshot capture can never fail on a valid row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Scheduled,
    Archived,
}

impl ContentStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Published => STATUS_PUBLISHED,
            Self::Scheduled => STATUS_SCHEDULED,
            Self::Archived => STATUS_ARCHIVED,
        }
    }

    /// Parse from a database string. Unknown values fall back to `Draft`.
    pub fn parse(s: &str) -> Self {
        match s {
            STATUS_PUBLISHED => Self::Published,
            STATUS_SCHEDULED => Self::Scheduled,
            STATUS_ARCHIVED => Self::Archived,
            _ => Self::Draft,
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// One ordered, typed element of a content item's body.
///
/// Blocks carry no stable identity across edits; equality is purely
/// structural (type tag plus props), and list order is render order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub props: serde_json::Value,
}

impl Block {
    pub fn new(block_type: impl Into<String>, props: serde_json::Value) -> Self {
        Self {
            block_type: block_type.into(),
            props,
        }
    }
}

// ---------------------------------------------------------------------------
// Limits and validation
// ---------------------------------------------------------------------------

/// Maximum allowed length for a revision comment.
pub const MAX_COMMENT_LENGTH: usize = 1_000;

/// Validate a revision comment: within [`MAX_COMMENT_LENGTH`] characters.
pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Revision comment must not exceed {MAX_COMMENT_LENGTH} characters, got {}",
            comment.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_as_str_round_trips() {
        for status in [
            ContentStatus::Draft,
            ContentStatus::Published,
            ContentStatus::Scheduled,
            ContentStatus::Archived,
        ] {
            assert_eq!(ContentStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_falls_back_to_draft() {
        assert_eq!(ContentStatus::parse("bogus"), ContentStatus::Draft);
        assert_eq!(ContentStatus::parse(""), ContentStatus::Draft);
    }

    #[test]
    fn status_serde_uses_snake_case() {
        let json = serde_json::to_string(&ContentStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
    }

    #[test]
    fn block_equality_is_structural() {
        let a = Block::new("paragraph", json!({"text": "hello"}));
        let b = Block::new("paragraph", json!({"text": "hello"}));
        let c = Block::new("paragraph", json!({"text": "goodbye"}));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn block_serde_uses_type_tag() {
        let block = Block::new("heading", json!({"level": 2}));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "heading");
        assert_eq!(value["props"]["level"], 2);
    }

    #[test]
    fn comment_length_is_bounded() {
        assert!(validate_comment("restored after typo").is_ok());
        assert!(validate_comment(&"x".repeat(MAX_COMMENT_LENGTH)).is_ok());
        assert!(validate_comment(&"x".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
    }
}
