//! Products domain module.
//!
//! This crate contains the product entity, the persistence port that storage
//! backends implement, and the application service that the inbound adapter
//! calls. No IO, no HTTP, no concrete storage.

pub mod product;
pub mod repository;
pub mod service;

pub use product::{Product, ProductDraft};
pub use repository::{ProductRepository, RepositoryError};
pub use service::{ProductService, ServiceError};
