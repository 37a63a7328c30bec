//! Catalog product.

use chrono::{DateTime, Utc};

use fluxy_core::{Price, ProductId};

/// A catalog entry.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Current (live) price; orders snapshot it at checkout.
    pub price: Price,
    /// Image file name under `/static/img/`.
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Public URL of the product image.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("/static/img/{}", self.image)
    }
}
