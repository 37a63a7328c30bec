//! Subcommand implementations.

pub mod catalog;
pub mod migrate;
pub mod orders;

use sqlx::SqlitePool;
use thiserror::Error;

use fluxy_storefront::db::{self, RepositoryError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Could not open the database.
    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    /// A repository call failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// An argument could not be parsed.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),

    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),
}

/// Open the storefront database and bring its schema up to date.
///
/// Reads `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) after loading `.env`.
pub async fn connect() -> Result<SqlitePool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = fluxy_storefront::config::database_url_from_env();

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    Ok(pool)
}
