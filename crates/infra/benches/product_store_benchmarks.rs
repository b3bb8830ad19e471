use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catalog_infra::product_store::InMemoryProductRepository;
use catalog_products::{Product, ProductRepository};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime")
}

fn seeded(rt: &tokio::runtime::Runtime, count: usize) -> InMemoryProductRepository {
    let repo = InMemoryProductRepository::new();
    rt.block_on(async {
        for i in 0..count {
            let product = Product::new(format!("p-{i}"), format!("Product {i}"), i as f64).unwrap();
            repo.add(&product).await.unwrap();
        }
    });
    repo
}

fn bench_get_by_id(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("in_memory/get_by_id");

    for size in [100usize, 10_000] {
        let repo = seeded(&rt, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let id = format!("p-{}", size / 2);
            b.iter(|| rt.block_on(repo.get_by_id(black_box(&id))).unwrap());
        });
    }

    group.finish();
}

fn bench_get_all(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("in_memory/get_all");

    for size in [100usize, 10_000] {
        let repo = seeded(&rt, size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(rt.block_on(repo.get_all()).unwrap()));
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let rt = runtime();
    let repo = seeded(&rt, 1_000);
    let changes = Product::new("p-500", "Renamed", 42.0).unwrap();

    c.bench_function("in_memory/update", |b| {
        b.iter(|| rt.block_on(repo.update(black_box(&changes))).unwrap());
    });
}

fn bench_add_delete(c: &mut Criterion) {
    let rt = runtime();
    let repo = seeded(&rt, 1_000);
    let product = Product::new("transient", "Transient", 1.0).unwrap();

    c.bench_function("in_memory/add_then_delete", |b| {
        b.iter(|| {
            rt.block_on(async {
                repo.add(black_box(&product)).await.unwrap();
                repo.delete(black_box("transient")).await.unwrap();
            })
        });
    });
}

criterion_group!(benches, bench_get_by_id, bench_get_all, bench_update, bench_add_delete);
criterion_main!(benches);
