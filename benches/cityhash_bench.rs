use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rowbin::block::city_hash128;

fn short_bench(c: &mut Criterion) {
    let data = [0x5au8; 15];
    c.bench_function("cityhash128_15b", |b| {
        b.iter(|| black_box(city_hash128(black_box(&data))))
    });
}

fn long_bench(c: &mut Criterion) {
    let data: Vec<u8> = (0..64 * 1024u32).map(|i| i as u8).collect();
    c.bench_function("cityhash128_64k", |b| {
        b.iter(|| black_box(city_hash128(black_box(&data))))
    });
}

criterion_group! {
    name = cityhash_benches;
    config = Criterion::default();
    targets = short_bench, long_bench
}

criterion_main!(cityhash_benches);
