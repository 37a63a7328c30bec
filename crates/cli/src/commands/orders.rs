//! Order inspection and cleanup commands.
//!
//! # Usage
//!
//! ```bash
//! # Every order, newest first
//! fluxy-cli orders list
//!
//! # Orders placed by one customer
//! fluxy-cli orders list -u ana@example.com
//!
//! # Delete an order and its line items
//! fluxy-cli orders delete --id 42
//! ```

use fluxy_core::{Email, OrderId};
use fluxy_storefront::db::{OrderRepository, RepositoryError, UserRepository};

use super::{CliError, connect};

/// Print orders, optionally only those belonging to `user_email`.
pub async fn list(user_email: Option<&str>) -> Result<(), CliError> {
    let pool = connect().await?;
    let orders = OrderRepository::new(&pool);

    let Some(raw_email) = user_email else {
        let summaries = orders.list_all().await?;

        #[allow(clippy::print_stdout)]
        for s in &summaries {
            println!(
                "#{:<5} {}  {:<24} {:>4} itens  {:>12}  {}",
                s.order.id,
                s.order.created_at.format("%Y-%m-%d %H:%M"),
                s.user_email,
                s.item_count,
                s.order.total,
                s.order.status
            );
        }
        tracing::info!(count = summaries.len(), "Listed orders");
        return Ok(());
    };

    let email =
        Email::parse(raw_email).map_err(|e| CliError::InvalidArgument("email", e.to_string()))?;
    let user = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("User {email}")))?;

    let placed = orders.list_for_user(user.id).await?;

    #[allow(clippy::print_stdout)]
    for o in &placed {
        println!(
            "#{:<5} {}  {:>12}  {}",
            o.order.id,
            o.order.created_at.format("%Y-%m-%d %H:%M"),
            o.order.total,
            o.order.status
        );
        for item in &o.items {
            println!(
                "        {} x {} @ {}",
                item.quantity, item.product_name, item.unit_price
            );
        }
    }
    tracing::info!(count = placed.len(), user_id = %user.id, "Listed orders");

    Ok(())
}

/// Delete an order; its line items go with it.
pub async fn delete(id: i64) -> Result<(), CliError> {
    let pool = connect().await?;

    match OrderRepository::new(&pool).delete(OrderId::new(id)).await {
        Ok(()) => {
            tracing::info!(order_id = id, "Order deleted");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(CliError::NotFound(format!("Order #{id}"))),
        Err(e) => Err(e.into()),
    }
}
