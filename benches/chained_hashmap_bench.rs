use chained_hashmap::ChainedHashMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("chained_hashmap_put_10k", |b| {
        b.iter_batched(
            || lcg(1).take(10_000).map(key).collect::<Vec<_>>(),
            |keys| {
                // Starts at 16 buckets, so this includes every resize up to 16k.
                let mut m = ChainedHashMap::new();
                for (i, k) in keys.into_iter().enumerate() {
                    m.put(k, i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_overwrite(c: &mut Criterion) {
    c.bench_function("chained_hashmap_put_overwrite", |b| {
        let mut m = ChainedHashMap::new();
        let keys: Vec<_> = lcg(3).take(1_000).map(key).collect();
        for k in &keys {
            m.put(k.clone(), 0u64);
        }
        let mut it = keys.iter().cycle();
        let mut n = 0u64;
        b.iter(|| {
            n += 1;
            m.put(it.next().unwrap().clone(), n);
        })
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("chained_hashmap_get_hit", |b| {
        let mut m = ChainedHashMap::new();
        let keys: Vec<_> = lcg(7).take(20_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            m.put(k.clone(), i as u64);
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k.as_str()).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("chained_hashmap_get_miss", |b| {
        let mut m = ChainedHashMap::new();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            m.put(key(x), i as u64);
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in map
            let k = key(miss.next().unwrap());
            black_box(m.get(k.as_str()));
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_overwrite, bench_get_hit, bench_get_miss
}
criterion_main!(benches);
