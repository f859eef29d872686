//! Database Module
//!
//! PostgreSQL connection pool, migrations and ID conversions.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseSettings;

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(&settings.url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Round-trip a trivial query to check the pool can reach the server.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Convert a wire ID to a BIGINT key.
///
/// IDs beyond the BIGINT range can never have been stored, so they map to a
/// key that matches no row.
pub(crate) fn to_db_id(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(-1)
}

/// Convert a stored BIGINT key back to a wire ID. Stored keys are positive.
pub(crate) fn from_db_id(id: i64) -> u64 {
    u64::try_from(id).unwrap_or_default()
}

/// Pool against `DATABASE_URL` with migrations applied, for database tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> PgPool {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}
