use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use catalog_core::{DomainError, DomainResult};

/// Product entity.
///
/// A `Product` can only be obtained through [`Product::new`] or
/// [`Product::restore`], both of which reject an empty identifier, so a stored or
/// returned product always carries a non-empty `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: String,
    name: String,
    price: f64,
    created_at: DateTime<Utc>,
}

impl Product {
    /// Validated constructor. Stamps `created_at` with the current time.
    ///
    /// The timestamp is truncated to microseconds, the resolution of a Postgres
    /// `TIMESTAMPTZ`, so a product reads back equal after a database round trip.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> DomainResult<Self> {
        Self::restore(id, name, price, Utc::now().trunc_subsecs(6))
    }

    /// Rebuild a product from persisted state, keeping its original `created_at`.
    pub fn restore(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidIdentifier);
        }

        Ok(Self {
            id,
            name: name.into(),
            price,
            created_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the mutable attributes (`name`, `price`) with those of `changes`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_changes(&mut self, changes: &Product) {
        self.name.clone_from(&changes.name);
        self.price = changes.price;
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Product(ID: {}, Name: {}, Price: {:.2}, CreatedAt: {})",
            self.id,
            self.name,
            self.price,
            self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }
}

/// Caller-supplied product attributes, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl ProductDraft {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Run the draft through the product constructor.
    pub fn validate(&self) -> DomainResult<Product> {
        Product::new(self.id.clone(), self.name.clone(), self.price)
    }
}
