//! Database connection, migrations, and seeding

use std::time::Duration;

use quill_shared_config::DatabaseConfig;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::error::ApiResult;
use crate::repositories::AuthorRepository;

/// Open a connection pool for the configured database
///
/// In-memory databases are restricted to one long-lived connection, since
/// each new connection would see a fresh, empty database.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let mut options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    options = if config.is_in_memory() {
        options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options.max_connections(config.max_connections)
    };

    options.connect(&config.url).await
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Connect, migrate, and optionally seed in one step
pub async fn prepare(config: &DatabaseConfig) -> ApiResult<SqlitePool> {
    let pool = connect(config).await?;
    run_migrations(&pool).await?;

    if config.seed {
        AuthorRepository::new(pool.clone()).seed_defaults().await?;
    }
    Ok(pool)
}

/// Cheap round-trip used by readiness checks
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
