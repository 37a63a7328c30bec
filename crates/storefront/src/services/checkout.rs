//! Checkout: turns a session cart into a persisted order.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use fluxy_core::{Cart, OrderStatus};

use super::cart::CartService;
use super::payment::{PaymentReference, PaymentStub};
use crate::db::{OrderRepository, RepositoryError};
use crate::models::{CurrentUser, NewLineItem, OrderWithItems};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nobody is logged in.
    #[error("login required")]
    Unauthenticated,

    /// The cart has no entries that resolve to catalog products.
    #[error("cart is empty")]
    EmptyCart,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order: OrderWithItems,
    pub payment: PaymentReference,
}

/// Order engine.
pub struct CheckoutService<'a> {
    carts: CartService<'a>,
    orders: OrderRepository<'a>,
    payment: &'a PaymentStub,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, payment: &'a PaymentStub) -> Self {
        Self {
            carts: CartService::new(pool),
            orders: OrderRepository::new(pool),
            payment,
        }
    }

    /// Check out `cart` for `user`.
    ///
    /// Prices are read from the catalog now, snapshotted onto the line items,
    /// and summed into the order total. The cart is cleared only after the
    /// order is stored; on any error it is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Unauthenticated` without a user,
    /// `CheckoutError::EmptyCart` when nothing in the cart resolves to a
    /// product, and `CheckoutError::Repository` if persisting fails.
    #[instrument(skip_all, fields(user_id = user.map(|u| u.id.as_i64())))]
    pub async fn checkout(
        &self,
        user: Option<&CurrentUser>,
        cart: &mut Cart,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let user = user.ok_or(CheckoutError::Unauthenticated)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let view = self.carts.view(cart).await?;
        if view.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items: Vec<NewLineItem> = view
            .lines
            .iter()
            .map(|line| NewLineItem {
                product_id: line.product.id,
                quantity: line.quantity,
                unit_price: line.product.price,
            })
            .collect();

        let order = self
            .orders
            .create_with_items(user.id, &OrderStatus::awaiting_payment(), view.total, &items)
            .await?;

        cart.clear();

        let payment = self.payment.request(order.order.total, order.order.id);
        Ok(CheckoutReceipt { order, payment })
    }
}
