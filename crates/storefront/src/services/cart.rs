//! Cart rendering against the live catalog.

use sqlx::SqlitePool;
use tracing::instrument;

use fluxy_core::{Cart, Price};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// One resolved cart line.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    /// `quantity × product.price` at the current catalog price.
    pub subtotal: Price,
}

/// A cart joined against the catalog.
#[derive(Debug, Clone, Default)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total: Price,
}

impl CartView {
    /// Whether no line resolved to a catalog product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Joins session carts with the catalog.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Resolve every cart entry to its product and current price.
    ///
    /// Entries whose product no longer exists are skipped. Lines keep the
    /// order in which products were first added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog lookup fails, and
    /// `RepositoryError::DataCorruption` if a stored price makes a subtotal or
    /// the total overflow.
    #[instrument(skip(self, cart), fields(entries = cart.entries().len()))]
    pub async fn view(&self, cart: &Cart) -> Result<CartView, RepositoryError> {
        let mut view = CartView::default();

        for entry in cart.entries() {
            let Some(product) = self.products.get(entry.product_id).await? else {
                tracing::debug!(product_id = %entry.product_id, "Skipping cart entry for missing product");
                continue;
            };

            let amounts = product.price.times(entry.quantity).and_then(|subtotal| {
                view.total.plus(subtotal).map(|total| (subtotal, total))
            });
            let (subtotal, total) = amounts.map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "cart amount for product {}: {e}",
                    product.id
                ))
            })?;
            view.total = total;
            view.lines.push(CartLine {
                product,
                quantity: entry.quantity,
                subtotal,
            });
        }

        Ok(view)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use fluxy_core::ProductId;

    use super::*;
    use crate::db::connect_in_memory;
    use crate::db::products::NewProduct;

    #[tokio::test]
    async fn test_same_product_twice_doubles_subtotal() {
        let pool = connect_in_memory().await.unwrap();
        ProductRepository::new(&pool)
            .seed_defaults_if_empty()
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add(ProductId::new(1));
        cart.add(ProductId::new(1));

        let view = CartService::new(&pool).view(&cart).await.unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 2);
        assert_eq!(view.lines[0].subtotal.amount, Decimal::new(80, 0));
        assert_eq!(view.total.display(), "R$ 80.00");
    }

    #[tokio::test]
    async fn test_overflowing_price_is_an_error() {
        let pool = connect_in_memory().await.unwrap();
        let product = ProductRepository::new(&pool)
            .create(&NewProduct {
                name: "Caro demais".to_owned(),
                description: None,
                price: Price::parse("79228162514264337593543950335").unwrap(),
                image: "x.png".to_owned(),
            })
            .await
            .unwrap();

        let mut cart = Cart::new();
        cart.add(product.id);
        assert!(CartService::new(&pool).view(&cart).await.is_ok());

        cart.add(product.id);
        let err = CartService::new(&pool).view(&cart).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[tokio::test]
    async fn test_missing_products_are_skipped() {
        let pool = connect_in_memory().await.unwrap();
        let products = ProductRepository::new(&pool);
        products.seed_defaults_if_empty().await.unwrap();
        products.delete(ProductId::new(2)).await.unwrap();

        let mut cart = Cart::new();
        cart.add(ProductId::new(2));
        cart.add(ProductId::new(5));
        cart.add(ProductId::new(404));

        let view = CartService::new(&pool).view(&cart).await.unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].product.name, "Lista IPTV");
        assert_eq!(view.total.amount, Decimal::new(25, 0));
    }

    #[tokio::test]
    async fn test_empty_cart_view() {
        let pool = connect_in_memory().await.unwrap();
        let view = CartService::new(&pool).view(&Cart::new()).await.unwrap();
        assert!(view.is_empty());
        assert_eq!(view.total, Price::zero());
    }
}
