//! # LesCracks DB
//!
//! Postgres connection pool and embedded schema migrations.
//!
//! ```ignore
//! use lescracks_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_config).await?;
//! run_migrations(&pool).await?;
//! ```

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;

use lescracks_config::DatabaseConfig;

pub use sqlx::PgPool;

/// Schema migrations, embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a pool sized and bounded by `config`.
///
/// Acquiring a connection waits at most `config.acquire_timeout`; past that
/// the caller gets `sqlx::Error::PoolTimedOut` instead of queueing forever.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Database pool ready"
    );

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
