//! Fluxy Store CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply storefront database migrations
//! fluxy-cli migrate
//!
//! # Insert the default catalog into an empty database
//! fluxy-cli seed
//!
//! # Add a product
//! fluxy-cli catalog add -n "Cabo HDMI" -p 19.90 -i hdmi.png
//!
//! # Inspect and clean up orders
//! fluxy-cli orders list -u ana@example.com
//! fluxy-cli orders delete --id 42
//! ```
//!
//! Log output goes to stderr; listings go to stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fluxy-cli")]
#[command(author, version, about = "Fluxy Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert the default catalog if no products exist
    Seed,
    /// Manage the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect and delete orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Add a product
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price in BRL, e.g. `19.90`
        #[arg(short, long)]
        price: String,

        /// Image file name under `static/img/`
        #[arg(short, long)]
        image: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List all products
    List,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// Only orders placed by this customer
        #[arg(short, long)]
        user_email: Option<String>,
    },
    /// Delete an order and its line items
    Delete {
        /// Order ID
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::migrate::seed().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Add {
                name,
                price,
                image,
                description,
            } => {
                commands::catalog::add(&name, &price, &image, description.as_deref()).await?;
            }
            CatalogAction::List => commands::catalog::list().await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { user_email } => {
                commands::orders::list(user_email.as_deref()).await?;
            }
            OrdersAction::Delete { id } => commands::orders::delete(id).await?,
        },
    }
    Ok(())
}
