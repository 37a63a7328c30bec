//! Database operations for the storefront `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Customer accounts (unique email and national ID)
//! - `products` - Catalog
//! - `orders` - Completed checkouts
//! - `line_items` - Order lines with unit-price snapshots
//! - `tower_sessions` - Session storage (created by the session store itself)
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into the
//! binary. The storefront applies them on startup; they can also be run via:
//! ```bash
//! cargo run -p fluxy-cli -- migrate
//! ```

pub mod orders;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation; carries the offending column (e.g. `email`).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify an insert/delete failure, turning constraint violations into
    /// `Conflict` with the column or relation reported by `SQLite`.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                // SQLite reports "UNIQUE constraint failed: users.email"
                let column = db_err
                    .message()
                    .rsplit('.')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_owned();
                return Self::Conflict(column);
            }
            if db_err.is_foreign_key_violation() {
                return Self::Conflict("foreign_key".to_owned());
            }
        }
        Self::Database(err)
    }
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing and foreign keys are enforced so
/// deleting an order cascades to its line items.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a private in-memory database with the schema applied.
///
/// Every `:memory:` connection is its own database, so the pool is pinned to a
/// single connection that never expires.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the connection or a migration fails.
pub async fn connect_in_memory() -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply all pending schema migrations.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), RepositoryError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| RepositoryError::Database(e.into()))?;
    tracing::info!("Database migrations applied");
    Ok(())
}
