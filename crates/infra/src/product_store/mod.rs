//! Product repository backends.
//!
//! Both backends implement `catalog_products::ProductRepository` and are
//! interchangeable: the process picks one at startup and hands it to the
//! application service.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductRepository;
pub use postgres::PostgresProductRepository;

/// DDL for the relational backend's table.
pub const PRODUCTS_SCHEMA: &str = include_str!("../../sql/products.sql");
