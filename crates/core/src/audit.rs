//! Audit trail constants and utility functions.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the repository layer and any future worker or CLI tooling.

use crate::hashing;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for audit entries.
pub mod action_types {
    /// A content item was restored to an earlier revision.
    pub const REVERT: &str = "revert";
    pub const ENTITY_CREATE: &str = "entity_create";
    pub const ENTITY_UPDATE: &str = "entity_update";
    pub const ENTITY_DELETE: &str = "entity_delete";
    pub const REVISION_DELETE: &str = "revision_delete";
    pub const SYSTEM: &str = "system";
}

// ---------------------------------------------------------------------------
// Target entity type constants
// ---------------------------------------------------------------------------

/// Known target entity types for audit entries.
pub mod entity_types {
    pub const CONTENT_ITEM: &str = "content_item";
    pub const REVISION: &str = "revision";
}

/// Metadata key carrying the restored-to revision id on `revert` entries.
pub const META_REVERTED_TO_REVISION_ID: &str = "reverted_to_revision_id";

// ---------------------------------------------------------------------------
// Integrity hash computation
// ---------------------------------------------------------------------------

/// Known seed value for the first entry in the hash chain.
const CHAIN_SEED: &str = "AUDIT_LOG_CHAIN_SEED_V1";

/// Compute the SHA-256 integrity hash for an audit entry.
///
/// `prev_hash` is the integrity hash of the previous entry, or `None` for
/// the first entry in the chain (which uses a known seed value).
///
/// `entry_data` is a canonical string representation of the entry's content
/// (see [`canonical_entry_data`]).
pub fn compute_integrity_hash(prev_hash: Option<&str>, entry_data: &str) -> String {
    let prev = prev_hash.unwrap_or(CHAIN_SEED);
    let combined = format!("{prev}|{entry_data}");
    hashing::sha256_hex(combined.as_bytes())
}

/// Build the canonical string representation of an audit entry's content
/// for hashing. serde_json object keys serialize sorted, so the output is
/// stable for identical inputs.
pub fn canonical_entry_data(
    user_id: Option<DbId>,
    action_type: &str,
    entity_type: Option<&str>,
    entity_id: Option<DbId>,
    details: Option<&serde_json::Value>,
) -> String {
    serde_json::json!({
        "user_id": user_id,
        "action_type": action_type,
        "entity_type": entity_type,
        "entity_id": entity_id,
        "details": details,
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Fields that should be redacted from audit details before storage.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "access_token",
    "refresh_token",
    "api_key",
    "private_key",
    "authorization",
    "credential",
    "session_token",
];

/// Redact sensitive fields from a JSON value.
///
/// Replaces the value of any key matching [`SENSITIVE_FIELDS`] with
/// `"[REDACTED]"`, recursing into nested objects and arrays. Returns a new
/// `serde_json::Value` with redactions applied.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
