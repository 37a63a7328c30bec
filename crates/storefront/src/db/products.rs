//! Catalog repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use fluxy_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::Product;

/// Products inserted into an empty catalog: (name, price, image).
pub const DEFAULT_CATALOG: &[(&str, &str, &str)] = &[
    ("Pendrive Boot Linux", "40.00", "linux.png"),
    ("Pendrive Boot Android", "30.00", "android.png"),
    ("Pendrive Android TV", "35.00", "androidtv.png"),
    ("Pendrive Google TV", "35.00", "googletv.png"),
    ("Lista IPTV", "25.00", "iptv.png"),
];

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: String,
    image: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&r.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", r.id))
        })?;

        Ok(Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price,
            image: r.image,
            created_at: r.created_at,
        })
    }
}

/// Fields for a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub image: String,
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the whole catalog, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, created_at
            FROM products
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by ID, with its current price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, price, image, created_at
            FROM products
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, description, price, image, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, description, price, image, created_at
            ",
        )
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.price.to_plain_string())
        .bind(&product.image)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Product::try_from(row)
    }

    /// Remove a product from the catalog.
    ///
    /// Carts that still reference it simply stop showing it. Products that
    /// appear on an order cannot be removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if an order line references it.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Insert [`DEFAULT_CATALOG`] if the catalog is empty.
    ///
    /// Returns the number of products inserted (0 when the catalog already had
    /// entries).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn seed_defaults_if_empty(&self) -> Result<usize, RepositoryError> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        for (name, price, image) in DEFAULT_CATALOG {
            sqlx::query(
                r"
                INSERT INTO products (name, price, image, created_at)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(*name)
            .bind(*price)
            .bind(*image)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!(count = DEFAULT_CATALOG.len(), "Seeded default catalog");
        Ok(DEFAULT_CATALOG.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::connect_in_memory;

    #[tokio::test]
    async fn test_seed_only_runs_on_empty_catalog() {
        let pool = connect_in_memory().await.unwrap();
        let repo = ProductRepository::new(&pool);

        assert_eq!(repo.seed_defaults_if_empty().await.unwrap(), 5);
        assert_eq!(repo.seed_defaults_if_empty().await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 5);

        let products = repo.list().await.unwrap();
        assert_eq!(products[0].name, "Pendrive Boot Linux");
        assert_eq!(products[0].price.amount, Decimal::new(40, 0));
        assert_eq!(products[0].image_url(), "/static/img/linux.png");
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let pool = connect_in_memory().await.unwrap();
        let repo = ProductRepository::new(&pool);

        let created = repo
            .create(&NewProduct {
                name: "Cabo HDMI".to_owned(),
                description: Some("2 metros".to_owned()),
                price: Price::parse("19.90").unwrap(),
                image: "hdmi.png".to_owned(),
            })
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.price.display(), "R$ 19.90");
        assert_eq!(fetched.description.as_deref(), Some("2 metros"));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(created.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_price_is_reported() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO products (name, price, image, created_at) VALUES ('X', 'abc', 'x.png', ?)",
        )
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        let err = ProductRepository::new(&pool).list().await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
