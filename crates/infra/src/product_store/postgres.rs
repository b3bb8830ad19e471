//! Postgres-backed product repository.
//!
//! Every operation is exactly one parameterized statement against the
//! `products` table (see `sql/products.sql`), so each write is atomic at the
//! statement level and needs no explicit transaction.
//!
//! ## Error Mapping
//!
//! | Situation | Source signal | RepositoryError |
//! |-----------|---------------|-----------------|
//! | Duplicate id on insert | SQLSTATE `23505` (unique violation) | `Domain(AlreadyExists)` |
//! | Lookup matches nothing | zero rows | `Domain(NotFound)` |
//! | Update/delete matches nothing | zero affected rows | `Domain(NotFound)` |
//! | Stored row fails domain validation | decode step | `Backend` |
//! | Anything else (pool closed, I/O, other SQLSTATE) | `sqlx::Error` | `Backend` |
//!
//! ## Thread Safety
//!
//! `PostgresProductRepository` is `Send + Sync + Clone`; clones share one SQLx
//! connection pool, which is the single shared handle for all requests.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tokio_stream::StreamExt;
use tracing::{info, instrument};

use catalog_core::DomainError;
use catalog_products::{Product, ProductRepository, RepositoryError};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// How long construction (and any later checkout) waits for a connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Postgres-backed product repository.
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductRepository {
    fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool from a connection URL and verify it with a round trip.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| map_sqlx_error("connect", e))?;

        Self::connect_with(options, max_connections).await
    }

    /// Same as [`connect`](Self::connect), from pre-built connect options.
    pub async fn connect_with(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, RepositoryError> {
        Self::connect_with_timeout(options, max_connections, DEFAULT_ACQUIRE_TIMEOUT).await
    }

    /// Build the pool and verify it. Fails once `acquire_timeout` elapses
    /// without a usable connection.
    #[instrument(skip(options), err)]
    pub async fn connect_with_timeout(
        options: PgConnectOptions,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let repo = Self::new(pool);
        repo.ping().await?;
        info!("connected to postgres");
        Ok(repo)
    }

    /// Round-trip a trivial statement.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection. Later calls fail with a `Backend` error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn add(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO products (id, name, price, created_at) VALUES ($1, $2, $3, $4)")
            .bind(product.id())
            .bind(product.name())
            .bind(product.price())
            .bind(product.created_at())
            .execute(&*self.pool)
            .await
            .map_err(map_insert_error)?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: &str) -> Result<Product, RepositoryError> {
        let row = sqlx::query("SELECT id, name, price, created_at FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_by_id", e))?
            .ok_or_else(RepositoryError::not_found)?;

        decode_product(&row)
    }

    #[instrument(skip(self), err)]
    async fn get_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut rows = sqlx::query("SELECT id, name, price, created_at FROM products").fetch(&*self.pool);

        // A failure on any row fails the whole call; no partial listing.
        let mut products = Vec::new();
        while let Some(row) = rows.next().await {
            let row = row.map_err(|e| map_sqlx_error("get_all", e))?;
            products.push(decode_product(&row)?);
        }

        Ok(products)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn update(&self, product: &Product) -> Result<(), RepositoryError> {
        // created_at is written once, on insert.
        let result = sqlx::query("UPDATE products SET name = $1, price = $2 WHERE id = $3")
            .bind(product.name())
            .bind(product.price())
            .bind(product.id())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update", e))?;

        ensure_row_affected(result.rows_affected())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        ensure_row_affected(result.rows_affected())
    }
}

/// Domain kind for the SQLSTATE of a failed `INSERT`, if it has one.
pub fn classify_insert_sqlstate(code: Option<&str>) -> Option<DomainError> {
    match code {
        Some(UNIQUE_VIOLATION) => Some(DomainError::AlreadyExists),
        _ => None,
    }
}

/// Zero affected rows means the statement matched no product.
pub fn ensure_row_affected(rows_affected: u64) -> Result<(), RepositoryError> {
    if rows_affected == 0 {
        return Err(RepositoryError::not_found());
    }
    Ok(())
}

fn map_insert_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(kind) = classify_insert_sqlstate(db_err.code().as_deref()) {
            return kind.into();
        }
    }
    map_sqlx_error("add", err)
}

/// Map SQLx errors to opaque repository errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => RepositoryError::backend(format!(
            "database error in {} (code {}): {}",
            operation,
            db_err.code().as_deref().unwrap_or("unknown"),
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            RepositoryError::backend(format!("connection pool closed in {operation}"))
        }
        _ => RepositoryError::backend(format!("sqlx error in {operation}: {err}")),
    }
}

fn decode_product(row: &PgRow) -> Result<Product, RepositoryError> {
    let row = ProductRow::from_row(row)
        .map_err(|e| RepositoryError::backend(format!("failed to deserialize product row: {e}")))?;
    row.try_into()
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Product::restore(row.id, row.name, row.price, row.created_at)
            .map_err(|e| RepositoryError::backend(format!("stored product row rejected: {e}")))
    }
}
