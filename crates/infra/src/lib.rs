//! Infrastructure layer: storage backends and configuration.

pub mod config;
pub mod product_store;
