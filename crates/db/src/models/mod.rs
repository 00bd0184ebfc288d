//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Query-parameter DTOs for filtered listings where applicable

pub mod audit;
pub mod content_item;
pub mod revision;
