use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_products::{Product, ProductDraft};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// Unknown fields (including any `created_at`) are ignored.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl From<ProductRequest> for ProductDraft {
    fn from(req: ProductRequest) -> Self {
        ProductDraft::new(req.id, req.name, req.price)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id().to_string(),
            name: p.name().to_string(),
            price: p.price(),
            created_at: p.created_at(),
        }
    }
}
