//! Order repository.
//!
//! Orders and their line items are always written together inside one
//! transaction, so a failure never leaves an order without its lines.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use fluxy_core::{Email, LineItemId, OrderId, OrderStatus, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{LineItem, NewLineItem, Order, OrderSummary, OrderWithItems};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    total: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        let total = Price::parse(&r.total).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid total for order {}: {e}", r.id))
        })?;

        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            status: r.status,
            total,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: LineItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: i64,
    unit_price: String,
}

impl TryFrom<LineItemRow> for LineItem {
    type Error = RepositoryError;

    fn try_from(r: LineItemRow) -> Result<Self, Self::Error> {
        let unit_price = Price::parse(&r.unit_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid unit price on line {}: {e}", r.id))
        })?;
        let quantity = u32::try_from(r.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid quantity {} on line {}",
                r.quantity, r.id
            ))
        })?;
        let subtotal = unit_price.times(quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("subtotal of line {}: {e}", r.id))
        })?;

        Ok(Self {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity,
            unit_price,
            subtotal,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    #[sqlx(flatten)]
    order: OrderRow,
    user_name: String,
    user_email: String,
    item_count: i64,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(r: OrderSummaryRow) -> Result<Self, Self::Error> {
        let user_email = Email::parse(&r.user_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let item_count = u32::try_from(r.item_count).map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid item count {}", r.item_count))
        })?;

        Ok(Self {
            order: Order::try_from(r.order)?,
            user_name: r.user_name,
            user_email,
            item_count,
        })
    }
}

const LINE_ITEM_SELECT: &str = r"
    SELECT li.id, li.order_id, li.product_id, p.name AS product_name,
           li.quantity, li.unit_price
    FROM line_items li
    JOIN products p ON p.id = li.product_id
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist an order and all of its lines atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict("foreign_key")` if the user or one of
    /// the products no longer exists. Nothing is written in that case.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_items(
        &self,
        user_id: UserId,
        status: &OrderStatus,
        total: Price,
        items: &[NewLineItem],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, status, total, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, status, total, created_at
            ",
        )
        .bind(user_id)
        .bind(status)
        .bind(total.to_plain_string())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;
        let order = Order::try_from(order_row)?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO line_items (order_id, product_id, quantity, unit_price)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(i64::from(item.quantity))
            .bind(item.unit_price.to_plain_string())
            .execute(&mut *tx)
            .await
            .map_err(RepositoryError::from_write)?;
        }

        let items = sqlx::query_as::<_, LineItemRow>(&format!(
            "{LINE_ITEM_SELECT} WHERE li.order_id = ? ORDER BY li.id ASC"
        ))
        .bind(order.id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(LineItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            lines = items.len(),
            total = %total.to_plain_string(),
            "Order created"
        );

        Ok(OrderWithItems { order, items })
    }

    /// Get an order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored amounts are invalid.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, status, total, created_at
            FROM orders
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = Order::try_from(row)?;
        let items = self.items_for(order.id).await?;

        Ok(Some(OrderWithItems { order, items }))
    }

    /// All orders placed by one user, newest first, each with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if stored amounts are invalid.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, user_id, status, total, created_at
            FROM orders
            WHERE user_id = ?
            ORDER BY id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let order = Order::try_from(row)?;
            let items = self.items_for(order.id).await?;
            orders.push(OrderWithItems { order, items });
        }

        Ok(orders)
    }

    /// Every order in the store with its owner, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_all(&self) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r"
            SELECT o.id, o.user_id, o.status, o.total, o.created_at,
                   u.name AS user_name, u.email AS user_email,
                   COALESCE((SELECT SUM(li.quantity) FROM line_items li WHERE li.order_id = o.id), 0)
                       AS item_count
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderSummary::try_from).collect()
    }

    /// Delete an order; its line items go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<LineItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, LineItemRow>(&format!(
            "{LINE_ITEM_SELECT} WHERE li.order_id = ? ORDER BY li.id ASC"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(LineItem::try_from).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use fluxy_core::NationalId;
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::{ProductRepository, UserRepository, connect_in_memory};
    use crate::models::{NewUser, Product, User};

    async fn customer(pool: &SqlitePool, email: &str, national_id: &str) -> User {
        UserRepository::new(pool)
            .create(
                &NewUser {
                    name: "Carlos Lima".to_owned(),
                    email: Email::parse(email).unwrap(),
                    national_id: NationalId::parse(national_id).unwrap(),
                    birth_date: NaiveDate::from_ymd_opt(1985, 1, 2).unwrap(),
                    address: "Av. Central, 200".to_owned(),
                },
                "hash",
            )
            .await
            .unwrap()
    }

    async fn catalog(pool: &SqlitePool) -> Vec<Product> {
        let repo = ProductRepository::new(pool);
        repo.seed_defaults_if_empty().await.unwrap();
        repo.list().await.unwrap()
    }

    fn line(product: &Product, quantity: u32) -> NewLineItem {
        NewLineItem {
            product_id: product.id,
            quantity,
            unit_price: product.price,
        }
    }

    #[tokio::test]
    async fn test_create_with_items_round_trip() {
        let pool = connect_in_memory().await.unwrap();
        let user = customer(&pool, "carlos@example.com", "11122233344").await;
        let products = catalog(&pool).await;

        let items = [line(&products[0], 2), line(&products[1], 1)];
        let total = items
            .iter()
            .try_fold(Price::zero(), |acc, i| {
                acc.plus(i.unit_price.times(i.quantity)?)
            })
            .unwrap();
        let repo = OrderRepository::new(&pool);

        let created = repo
            .create_with_items(user.id, &OrderStatus::awaiting_payment(), total, &items)
            .await
            .unwrap();

        assert_eq!(created.order.total.amount, Decimal::new(110, 0));
        assert_eq!(created.order.status.as_str(), "Aguardando Pagamento");
        assert_eq!(created.items.len(), 2);
        assert_eq!(created.items[0].product_name, "Pendrive Boot Linux");
        assert_eq!(created.items_total().unwrap(), created.order.total);

        let fetched = repo.get_with_items(created.order.id).await.unwrap().unwrap();
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_snapshot_survives_price_change() {
        let pool = connect_in_memory().await.unwrap();
        let user = customer(&pool, "carlos@example.com", "11122233344").await;
        let products = catalog(&pool).await;
        let repo = OrderRepository::new(&pool);

        let order = repo
            .create_with_items(
                user.id,
                &OrderStatus::awaiting_payment(),
                products[4].price,
                &[line(&products[4], 1)],
            )
            .await
            .unwrap();

        sqlx::query("UPDATE products SET price = '99.00' WHERE id = ?")
            .bind(products[4].id)
            .execute(&pool)
            .await
            .unwrap();

        let fetched = repo.get_with_items(order.order.id).await.unwrap().unwrap();
        assert_eq!(fetched.items[0].unit_price.amount, Decimal::new(25, 0));
        assert_eq!(fetched.order.total.amount, Decimal::new(25, 0));
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_order() {
        let pool = connect_in_memory().await.unwrap();
        let user = customer(&pool, "carlos@example.com", "11122233344").await;
        let products = catalog(&pool).await;
        let repo = OrderRepository::new(&pool);

        let ghost = NewLineItem {
            product_id: ProductId::new(9_999),
            quantity: 1,
            unit_price: Price::zero(),
        };
        let err = repo
            .create_with_items(
                user.id,
                &OrderStatus::awaiting_payment(),
                products[0].price,
                &[line(&products[0], 1), ghost],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(repo.list_for_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_for_user_is_scoped() {
        let pool = connect_in_memory().await.unwrap();
        let ana = customer(&pool, "ana@example.com", "11122233344").await;
        let bia = customer(&pool, "bia@example.com", "55566677788").await;
        let products = catalog(&pool).await;
        let repo = OrderRepository::new(&pool);
        let status = OrderStatus::awaiting_payment();

        repo.create_with_items(ana.id, &status, products[0].price, &[line(&products[0], 1)])
            .await
            .unwrap();
        repo.create_with_items(bia.id, &status, products[1].price, &[line(&products[1], 1)])
            .await
            .unwrap();
        repo.create_with_items(ana.id, &status, products[2].price, &[line(&products[2], 1)])
            .await
            .unwrap();

        let mine = repo.list_for_user(ana.id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.order.user_id == ana.id));
        assert!(mine[0].order.id > mine[1].order.id);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].user_email.as_str(), "ana@example.com");
        assert_eq!(all[0].item_count, 1);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_line_items() {
        let pool = connect_in_memory().await.unwrap();
        let user = customer(&pool, "carlos@example.com", "11122233344").await;
        let products = catalog(&pool).await;
        let repo = OrderRepository::new(&pool);

        let order = repo
            .create_with_items(
                user.id,
                &OrderStatus::awaiting_payment(),
                products[0].price.times(3).unwrap(),
                &[line(&products[0], 3)],
            )
            .await
            .unwrap();

        // Products referenced by an order cannot be removed.
        assert!(matches!(
            ProductRepository::new(&pool).delete(products[0].id).await,
            Err(RepositoryError::Conflict(_))
        ));

        repo.delete(order.order.id).await.unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM line_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        assert!(repo.get_with_items(order.order.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(order.order.id).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
