//! Catalog management commands.
//!
//! # Usage
//!
//! ```bash
//! fluxy-cli catalog add -n "Cabo HDMI" -p 19.90 -i hdmi.png -d "2 metros"
//! fluxy-cli catalog list
//! ```

use fluxy_core::Price;
use fluxy_storefront::db::{ProductRepository, products::NewProduct};

use super::{CliError, connect};

/// Add a product to the catalog.
///
/// `image` is a file name under `static/img/`.
pub async fn add(
    name: &str,
    price: &str,
    image: &str,
    description: Option<&str>,
) -> Result<(), CliError> {
    let price =
        Price::parse(price).map_err(|e| CliError::InvalidArgument("price", e.to_string()))?;
    if name.trim().is_empty() {
        return Err(CliError::InvalidArgument(
            "name",
            "must not be empty".to_owned(),
        ));
    }

    let pool = connect().await?;
    let product = ProductRepository::new(&pool)
        .create(&NewProduct {
            name: name.trim().to_owned(),
            description: description.map(str::to_owned),
            price,
            image: image.to_owned(),
        })
        .await?;

    tracing::info!(
        "Product created! ID: {}, Name: {}, Price: {}",
        product.id,
        product.name,
        product.price
    );

    Ok(())
}

/// Print the catalog.
pub async fn list() -> Result<(), CliError> {
    let pool = connect().await?;
    let products = ProductRepository::new(&pool).list().await?;

    #[allow(clippy::print_stdout)]
    {
        if products.is_empty() {
            println!("Catalog is empty");
        }
        for product in &products {
            println!(
                "{:>4}  {:<32}  {:>10}  {}",
                product.id, product.name, product.price, product.image
            );
        }
    }

    Ok(())
}
