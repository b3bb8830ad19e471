use std::sync::Arc;

use tracing::info;

use catalog_infra::config::StorageConfig;
use catalog_infra::product_store::{InMemoryProductRepository, PostgresProductRepository};
use catalog_products::{ProductRepository, ProductService, RepositoryError};

/// Product service as seen by handlers: backend-agnostic, over a shared trait object.
pub type Products = ProductService<Arc<dyn ProductRepository>>;

/// Application services, wired once at startup for exactly one storage backend.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        products: Products,
    },
    Postgres {
        products: Products,
        store: Arc<PostgresProductRepository>,
    },
}

impl AppServices {
    /// Wire the backend named by `storage`. Fails if the database is unreachable.
    pub async fn from_config(storage: &StorageConfig) -> Result<Self, RepositoryError> {
        match storage {
            StorageConfig::InMemory => Ok(Self::in_memory()),
            StorageConfig::Postgres {
                database_url,
                max_connections,
            } => {
                let store = PostgresProductRepository::connect(database_url, *max_connections).await?;
                Ok(Self::postgres(store))
            }
        }
    }

    /// In-memory wiring (dev/test). State is lost on shutdown.
    pub fn in_memory() -> Self {
        let repo: Arc<dyn ProductRepository> = Arc::new(InMemoryProductRepository::new());
        info!("using in-memory product store");

        Self::InMemory {
            products: ProductService::new(repo),
        }
    }

    pub fn postgres(store: PostgresProductRepository) -> Self {
        let store = Arc::new(store);
        let repo: Arc<dyn ProductRepository> = store.clone();
        info!("using postgres product store");

        Self::Postgres {
            products: ProductService::new(repo),
            store,
        }
    }

    pub fn products(&self) -> &Products {
        match self {
            Self::InMemory { products, .. } | Self::Postgres { products, .. } => products,
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::InMemory { .. } => "memory",
            Self::Postgres { .. } => "postgres",
        }
    }

    /// Release backend resources (closes the Postgres pool).
    pub async fn shutdown(&self) {
        match self {
            Self::InMemory { .. } => {
                info!("in-memory store dropped");
            }
            Self::Postgres { store, .. } => {
                store.close().await;
                info!("postgres pool closed");
            }
        }
    }
}
