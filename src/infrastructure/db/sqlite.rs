use crate::domain::error::{AppError, Result};
use crate::domain::product::{BatchReceipt, NormalizedRecord};
use crate::infrastructure::sinks::ProductSink;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;

/// Product row as stored locally
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    pub id: i64,
    pub identity_key: String,
    pub record: NormalizedRecord,
    pub updated_at: NaiveDateTime,
}

pub struct SqliteProductRepository {
    pool: Pool<Sqlite>,
}

impl SqliteProductRepository {
    pub async fn init(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to parse connection string: {}", e))
            })?
            .create_if_missing(true);

        // Every connection to an in-memory database sees its own empty database
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                identity_key TEXT NOT NULL UNIQUE,
                fnsku TEXT,
                asin TEXT,
                lpn TEXT,
                upc TEXT,
                name TEXT,
                price REAL,
                category TEXT,
                quantity REAL,
                brand TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create table: {}", e)))?;

        Ok(Self { pool })
    }

    /// Upsert records in one transaction.
    /// Fields the incoming record leaves null keep their stored value.
    pub async fn upsert_products(&self, records: &[NormalizedRecord]) -> Result<BatchReceipt> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let mut receipt = BatchReceipt::default();
        for record in records {
            let Some(identity_key) = record.identity_key() else {
                receipt.failed += 1;
                continue;
            };

            sqlx::query(
                "INSERT INTO products (
                    identity_key, fnsku, asin, lpn, upc, name, price, category, quantity, brand
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(identity_key) DO UPDATE SET
                    fnsku = COALESCE(excluded.fnsku, products.fnsku),
                    asin = COALESCE(excluded.asin, products.asin),
                    lpn = COALESCE(excluded.lpn, products.lpn),
                    upc = COALESCE(excluded.upc, products.upc),
                    name = COALESCE(excluded.name, products.name),
                    price = COALESCE(excluded.price, products.price),
                    category = COALESCE(excluded.category, products.category),
                    quantity = COALESCE(excluded.quantity, products.quantity),
                    brand = COALESCE(excluded.brand, products.brand),
                    updated_at = CURRENT_TIMESTAMP",
            )
            .bind(identity_key)
            .bind(&record.fnsku)
            .bind(&record.asin)
            .bind(&record.lpn)
            .bind(&record.upc)
            .bind(&record.name)
            .bind(record.price)
            .bind(&record.category)
            .bind(record.quantity)
            .bind(&record.brand)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to upsert product: {}", e)))?;

            receipt.succeeded += 1;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(receipt)
    }

    pub async fn count_products(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count products: {}", e)))
    }

    /// One page of products, oldest first
    pub async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<StoredProduct>> {
        sqlx::query_as::<_, ProductEntity>(
            "SELECT id, identity_key, fnsku, asin, lpn, upc, name, price, category, quantity,
                    brand, updated_at
             FROM products ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch products: {}", e)))
        .map(|entities| entities.into_iter().map(|e| e.into()).collect())
    }
}

#[async_trait]
impl ProductSink for SqliteProductRepository {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn submit_batch(&self, records: &[NormalizedRecord]) -> Result<BatchReceipt> {
        self.upsert_products(records).await
    }
}

// Internal entity for database mapping
#[derive(sqlx::FromRow)]
struct ProductEntity {
    id: i64,
    identity_key: String,
    fnsku: Option<String>,
    asin: Option<String>,
    lpn: Option<String>,
    upc: Option<String>,
    name: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    quantity: Option<f64>,
    brand: Option<String>,
    updated_at: NaiveDateTime,
}

impl From<ProductEntity> for StoredProduct {
    fn from(e: ProductEntity) -> Self {
        Self {
            id: e.id,
            identity_key: e.identity_key,
            record: NormalizedRecord {
                fnsku: e.fnsku,
                asin: e.asin,
                lpn: e.lpn,
                upc: e.upc,
                name: e.name,
                price: e.price,
                category: e.category,
                quantity: e.quantity,
                brand: e.brand,
            },
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteProductRepository {
        SqliteProductRepository::init("sqlite::memory:").await.unwrap()
    }

    fn record(fnsku: &str, name: Option<&str>, quantity: Option<f64>) -> NormalizedRecord {
        NormalizedRecord {
            fnsku: Some(fnsku.to_string()),
            name: name.map(str::to_string),
            quantity,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_and_list() {
        let repo = repo().await;
        let receipt = repo
            .upsert_products(&[
                record("X001", Some("Widget"), Some(10.0)),
                record("X002", Some("Gadget"), None),
            ])
            .await
            .unwrap();

        assert_eq!(receipt, BatchReceipt { succeeded: 2, failed: 0 });
        assert_eq!(repo.count_products().await.unwrap(), 2);

        let page = repo.list_products(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].identity_key, "fnsku:X002");
        assert_eq!(page[0].record.name.as_deref(), Some("Gadget"));

        let now = chrono::Utc::now().naive_utc();
        assert!(page[0].updated_at <= now + chrono::Duration::seconds(1));
        assert!(page[0].updated_at > now - chrono::Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_upsert_keeps_existing_values_for_nulls() {
        let repo = repo().await;
        repo.upsert_products(&[record("X001", Some("Widget"), Some(10.0))])
            .await
            .unwrap();
        repo.upsert_products(&[record("X001", None, Some(4.0))])
            .await
            .unwrap();

        let rows = repo.list_products(10, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.name.as_deref(), Some("Widget"));
        assert_eq!(rows[0].record.quantity, Some(4.0));
    }

    #[tokio::test]
    async fn test_record_without_identifier_counted_failed() {
        let repo = repo().await;
        let orphan = NormalizedRecord {
            name: Some("No id".into()),
            ..Default::default()
        };
        let receipt = repo.submit_batch(&[orphan]).await.unwrap();
        assert_eq!(receipt, BatchReceipt { succeeded: 0, failed: 1 });
        assert_eq!(repo.count_products().await.unwrap(), 0);
    }
}
