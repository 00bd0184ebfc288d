//! Error type for the persistence layer.
//!
//! Repository and coordinator operations surface four kinds of failure:
//! a missing row, a rejected input, a corrupt stored snapshot, and a
//! storage-level fault. Storage errors propagate unchanged so callers can
//! decide whether to retry the whole operation; nothing here retries
//! internally.

use inkstone_core::error::CoreError;
use inkstone_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Stored snapshot could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}
