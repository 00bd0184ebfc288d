//! Pure domain logic for the content revisioning core.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, background workers, and any future CLI tooling.
//! Persistence lives in `inkstone-db`.

pub mod audit;
pub mod content;
pub mod diff;
pub mod error;
pub mod hashing;
pub mod retention;
pub mod snapshot;
pub mod types;
