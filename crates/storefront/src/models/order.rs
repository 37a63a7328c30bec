//! Order domain types.

use chrono::{DateTime, Utc};

use fluxy_core::{Email, LineItemId, OrderId, OrderStatus, Price, PriceError, ProductId, UserId};

/// A persisted checkout.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Total frozen at checkout time; equals the sum of the line subtotals
    /// at creation and is never recomputed from live prices.
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

/// One product line of an order.
#[derive(Debug, Clone)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Product name at read time (joined from the catalog).
    pub product_name: String,
    pub quantity: u32,
    /// Price per unit captured at checkout.
    pub unit_price: Price,
    /// `quantity × unit_price`.
    pub subtotal: Price,
}

/// A line about to be written at checkout.
#[derive(Debug, Clone, Copy)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Price,
}

/// An order together with its lines.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<LineItem>,
}

impl OrderWithItems {
    /// Sum of the line subtotals.
    ///
    /// Matches `order.total` for every order created by checkout; kept for
    /// reconciliation, the stored total stays authoritative.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the sum does not fit in a `Decimal`.
    pub fn items_total(&self) -> Result<Price, PriceError> {
        self.items
            .iter()
            .try_fold(Price::zero(), |acc, item| acc.plus(item.subtotal))
    }
}

/// Order row for the back-office listing, with the owner's identity.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub order: Order,
    pub user_name: String,
    pub user_email: Email,
    pub item_count: u32,
}
