//! Product application service.
//!
//! The single entry point used by inbound adapters. Each operation validates its
//! input, then makes exactly one repository call (`update_product` makes a second
//! call to re-read the stored entity). The service holds no state of its own.

use thiserror::Error;
use tracing::instrument;

use catalog_core::DomainError;

use crate::product::{Product, ProductDraft};
use crate::repository::{ProductRepository, RepositoryError};

/// Service operation error.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The id in the request path differs from the id in the request body.
    #[error("product ID in path does not match ID in body")]
    IdMismatch { path: String, body: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Opaque infrastructure failure.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Domain(kind) => Self::Domain(kind),
            RepositoryError::Backend(msg) => Self::Backend(msg),
        }
    }
}

/// Application service over a product repository.
#[derive(Debug, Clone)]
pub struct ProductService<R> {
    repo: R,
}

impl<R> ProductService<R>
where
    R: ProductRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validate the draft and store it as a new product.
    #[instrument(skip(self, draft), fields(product_id = %draft.id), err)]
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, ServiceError> {
        let product = draft.validate()?;
        self.repo.add(&product).await?;
        Ok(product)
    }

    #[instrument(skip(self), err)]
    pub async fn get_product_by_id(&self, id: &str) -> Result<Product, ServiceError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_all_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.repo.get_all().await?)
    }

    /// Replace `name`/`price` of an existing product and return the stored result.
    ///
    /// The draft is validated with the product constructor, but only its `name`
    /// and `price` reach storage; the stored `created_at` is kept.
    #[instrument(skip(self, draft), err)]
    pub async fn update_product(&self, id: &str, draft: ProductDraft) -> Result<Product, ServiceError> {
        if id != draft.id {
            return Err(ServiceError::IdMismatch {
                path: id.to_string(),
                body: draft.id,
            });
        }

        let changes = draft.validate()?;
        self.repo.update(&changes).await?;

        Ok(self.repo.get_by_id(id).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_product(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.repo.delete(id).await?)
    }
}
