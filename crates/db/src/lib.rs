//! Persistence for dashlens: row models, the store seam with its PostgreSQL
//! and in-memory backends, the generic repository and the unit of work.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod change;
pub mod criteria;
pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod unit_of_work;

pub use error::DbError;
pub use repository::{Persisted, Repository};
pub use unit_of_work::UnitOfWork;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
