//! Persistence layer for the content revisioning core.
//!
//! Repositories are zero-sized structs providing async operations that
//! accept `&PgPool` as the first argument. Multi-step mutations (restore)
//! run inside a single transaction so no partial state is ever observable.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod history;
pub mod models;
pub mod repositories;
pub mod restore;
pub mod retention;

pub use error::StoreError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
