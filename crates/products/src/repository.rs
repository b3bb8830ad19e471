//! Product persistence port.
//!
//! This is the technology-agnostic contract that the application service depends
//! on and every storage backend implements. Backends are chosen once, at process
//! construction, and handed to the service as a value implementing this trait.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::DomainError;

use crate::product::Product;

/// Repository operation error.
///
/// Backends translate their native failure signals at the boundary:
/// - a duplicate key becomes `Domain(AlreadyExists)`
/// - a missing row / zero affected rows becomes `Domain(NotFound)`
/// - anything else (connectivity, decoding, unexpected engine error) is `Backend`
///
/// A `Backend` failure is never reported as a domain kind.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn not_found() -> Self {
        Self::Domain(DomainError::NotFound)
    }

    pub fn already_exists() -> Self {
        Self::Domain(DomainError::AlreadyExists)
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// The domain kind carried by this error, if any.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(kind) => Some(kind),
            Self::Backend(_) => None,
        }
    }
}

/// Persistence contract for products.
///
/// Every implementation must classify identical inputs against identical prior
/// state identically:
///
/// | operation   | success             | domain failure                         |
/// |-------------|---------------------|----------------------------------------|
/// | `add`       | `()`                | `AlreadyExists` when the id is taken   |
/// | `get_by_id` | the stored product  | `NotFound`                             |
/// | `get_all`   | all products (any order, possibly empty) | none              |
/// | `update`    | `()`                | `NotFound` when no entry has the id    |
/// | `delete`    | `()`                | `NotFound` when no entry has the id    |
///
/// A failed write leaves the stored state exactly as it was.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product.
    async fn add(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Load one product by id.
    async fn get_by_id(&self, id: &str) -> Result<Product, RepositoryError>;

    /// Snapshot of all stored products. Never fails just because nothing is stored.
    async fn get_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Overwrite `name` and `price` of the product with the same id.
    ///
    /// `created_at` on the argument is ignored; the stored creation time is kept.
    async fn update(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Remove the product with the given id.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn add(&self, product: &Product) -> Result<(), RepositoryError> {
        (**self).add(product).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Product, RepositoryError> {
        (**self).get_by_id(id).await
    }

    async fn get_all(&self) -> Result<Vec<Product>, RepositoryError> {
        (**self).get_all().await
    }

    async fn update(&self, product: &Product) -> Result<(), RepositoryError> {
        (**self).update(product).await
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        (**self).delete(id).await
    }
}
