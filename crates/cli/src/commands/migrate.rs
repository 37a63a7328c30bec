//! Database migration and seeding commands.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! fluxy-cli migrate
//!
//! # Insert the default catalog if the products table is empty
//! fluxy-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://fluxy.db?mode=rwc`)

use fluxy_storefront::db::ProductRepository;

use super::{CliError, connect};

/// Run storefront database migrations.
pub async fn run() -> Result<(), CliError> {
    connect().await?;
    tracing::info!("Storefront migrations complete!");
    Ok(())
}

/// Seed the default catalog.
pub async fn seed() -> Result<(), CliError> {
    let pool = connect().await?;

    let inserted = ProductRepository::new(&pool).seed_defaults_if_empty().await?;
    if inserted == 0 {
        tracing::info!("Catalog already has products, nothing seeded");
    }

    Ok(())
}
