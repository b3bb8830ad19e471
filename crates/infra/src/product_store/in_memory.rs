use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::instrument;

use catalog_products::{Product, ProductRepository, RepositoryError};

/// In-memory product repository.
///
/// A single `id -> Product` map behind a reader/writer lock: `get_by_id` and
/// `get_all` take shared access, `add`, `update` and `delete` take exclusive
/// access and do their existence check inside the same critical section.
///
/// Each instance owns its own map, so independent instances never share state.
/// Data is lost when the instance is dropped.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<String, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Product>>, RepositoryError> {
        self.products
            .read()
            .map_err(|_| RepositoryError::backend("lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Product>>, RepositoryError> {
        self.products
            .write()
            .map_err(|_| RepositoryError::backend("lock poisoned"))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn add(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.write()?;

        if products.contains_key(product.id()) {
            return Err(RepositoryError::already_exists());
        }
        products.insert(product.id().to_string(), product.clone());

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&self, id: &str) -> Result<Product, RepositoryError> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(RepositoryError::not_found)
    }

    #[instrument(skip(self), err)]
    async fn get_all(&self) -> Result<Vec<Product>, RepositoryError> {
        // Copy out; callers never see the live map.
        Ok(self.read()?.values().cloned().collect())
    }

    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn update(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.write()?;

        let stored = products
            .get_mut(product.id())
            .ok_or_else(RepositoryError::not_found)?;
        stored.apply_changes(product);

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let mut products = self.write()?;

        products
            .remove(id)
            .map(|_| ())
            .ok_or_else(RepositoryError::not_found)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use catalog_core::DomainError;

    use super::*;

    #[tokio::test]
    async fn instances_do_not_share_state() {
        let a = InMemoryProductRepository::new();
        let b = InMemoryProductRepository::new();

        a.add(&Product::new("1", "Widget", 9.99).unwrap()).await.unwrap();

        assert_eq!(a.get_all().await.unwrap().len(), 1);
        assert!(b.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_all_returns_a_snapshot() {
        let repo = InMemoryProductRepository::new();
        repo.add(&Product::new("1", "Widget", 9.99).unwrap()).await.unwrap();

        let snapshot = repo.get_all().await.unwrap();
        repo.delete("1").await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), "1");
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn poisoned_lock_is_an_opaque_failure() {
        let repo = Arc::new(InMemoryProductRepository::new());

        let poisoner = repo.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.products.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        match repo.get_all().await {
            Err(RepositoryError::Backend(msg)) => assert_eq!(msg, "lock poisoned"),
            other => panic!("expected Backend error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_and_readers_keep_the_map_consistent() {
        let repo = Arc::new(InMemoryProductRepository::new());
        repo.add(&Product::new("1", "Test Product", 100.0).unwrap())
            .await
            .unwrap();

        let mut writers = Vec::new();
        for i in 0..32 {
            let repo = repo.clone();
            writers.push(tokio::spawn(async move {
                let changes = Product::new("1", format!("Updated {i}"), 100.0 + i as f64).unwrap();
                repo.update(&changes).await
            }));
        }
        for w in writers {
            w.await.unwrap().unwrap();
        }

        let mut readers = Vec::new();
        for _ in 0..32 {
            let repo = repo.clone();
            readers.push(tokio::spawn(async move {
                let one = repo.get_by_id("1").await.unwrap();
                let all = repo.get_all().await.unwrap();
                (one, all)
            }));
        }
        for r in readers {
            let (one, all) = r.await.unwrap();
            assert_eq!(one.id(), "1");
            assert!(one.name().starts_with("Updated "));
            assert_eq!(all.len(), 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_of_one_id_admit_exactly_one() {
        let repo = Arc::new(InMemoryProductRepository::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let product = Product::new("same", format!("attempt {i}"), i as f64).unwrap();
                repo.add(&product).await
            }));
        }

        let mut ok = 0;
        let mut conflicts = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(()) => ok += 1,
                Err(RepositoryError::Domain(DomainError::AlreadyExists)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[test]
    fn os_threads_hammering_one_id_never_corrupt_state() {
        let repo = Arc::new(InMemoryProductRepository::new());
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(repo.add(&Product::new("1", "Test Product", 100.0).unwrap()))
            .unwrap();

        let threads: Vec<_> = (0..10)
            .map(|i| {
                let repo = repo.clone();
                std::thread::spawn(move || {
                    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                    rt.block_on(async {
                        if i % 2 == 0 {
                            let _ = repo.get_by_id("1").await;
                            let _ = repo.get_all().await;
                        } else {
                            let changes = Product::new("1", "Updated Product", 100.0 + i as f64).unwrap();
                            let _ = repo.update(&changes).await;
                        }
                    });
                })
            })
            .collect();

        for t in threads {
            t.join().expect("worker thread panicked");
        }

        let stored = rt.block_on(repo.get_by_id("1")).unwrap();
        assert!(!stored.id().is_empty());
        assert_eq!(rt.block_on(repo.get_all()).unwrap().len(), 1);
    }
}
