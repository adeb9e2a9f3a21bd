use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use pmp_cache::{Cache, LruTtlCache, NamedCache, ShardedCache};

const CAPACITY: usize = 10_000;

fn bench_put(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = rt.block_on(async {
        LruTtlCache::<u64, u64>::lru("bench-put", CAPACITY, Duration::from_secs(60)).unwrap()
    });
    let counter = AtomicU64::new(0);

    c.bench_function("ttl_cache_put", |b| {
        b.to_async(&rt).iter(|| {
            let key = counter.fetch_add(1, Ordering::Relaxed) % (CAPACITY as u64 * 2);
            let cache = &cache;
            async move { cache.put(key, key).await }
        })
    });
}

fn bench_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = rt.block_on(async {
        let cache =
            LruTtlCache::<u64, u64>::lru("bench-get", CAPACITY, Duration::from_secs(60)).unwrap();
        for i in 0..CAPACITY as u64 {
            cache.put(i, i).await;
        }
        cache
    });
    let counter = AtomicU64::new(0);

    // Alternates resident and absent keys, roughly half hits, half misses.
    c.bench_function("ttl_cache_get_mixed", |b| {
        b.to_async(&rt).iter(|| {
            let key = counter.fetch_add(1, Ordering::Relaxed) % (CAPACITY as u64 * 2);
            let cache = &cache;
            async move { cache.get(&key).await }
        })
    });
}

fn bench_sharded_put_get(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let sharded = rt.block_on(async {
        let nodes: Vec<Arc<dyn NamedCache<u64, u64>>> = (0..4)
            .map(|i| {
                Arc::new(
                    LruTtlCache::lru(format!("bench-node-{i}"), CAPACITY, Duration::from_secs(60))
                        .unwrap(),
                ) as Arc<dyn NamedCache<u64, u64>>
            })
            .collect();
        ShardedCache::new(nodes).unwrap()
    });
    let counter = AtomicU64::new(0);

    c.bench_function("sharded_put_get", |b| {
        b.to_async(&rt).iter(|| {
            let key = counter.fetch_add(1, Ordering::Relaxed) % (CAPACITY as u64);
            let sharded = &sharded;
            async move {
                sharded.put(key, key).await;
                sharded.get(&key).await
            }
        })
    });
}

criterion_group!(benches, bench_put, bench_get, bench_sharded_put_get);
criterion_main!(benches);
