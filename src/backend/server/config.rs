/**
 * Database Configuration
 *
 * Opens the SQLite pool and applies the embedded migrations from
 * `migrations/`. Unlike the other settings, the database is required: the
 * server refuses to start without it.
 *
 * # Connection Strings
 *
 * - `sqlite://yamba.db` - file next to the working directory (created if
 *   missing)
 * - `sqlite::memory:` - private in-memory database (tests)
 */

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Connection pool type used throughout the backend
pub type DbPool = SqlitePool;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Connect to the configured database and run migrations
///
/// # Errors
///
/// Returns the connection or migration error; the caller decides whether
/// startup can continue.
pub async fn load_database(database_url: &str) -> Result<DbPool, crate::backend::BackendError> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        // every connection to :memory: is a separate database
        in_memory_pool_options().connect_with(options).await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    MIGRATOR.run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}

/// Fresh migrated in-memory database
pub async fn connect_in_memory() -> Result<DbPool, crate::backend::BackendError> {
    load_database("sqlite::memory:").await
}

fn in_memory_pool_options() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}
