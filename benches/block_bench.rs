use std::io::{Read, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rowbin::{BlockReader, BlockWriter, CompressionMethod};

fn input() -> Vec<u8> {
    (0..256 * 1024u32).map(|i| (i % 97) as u8 ^ (i >> 11) as u8).collect()
}

fn write_blocks(data: &[u8], method: CompressionMethod) -> Vec<u8> {
    let mut writer = BlockWriter::new(Vec::new(), method, 8192);
    writer.write_all(data).unwrap();
    writer.into_inner().unwrap()
}

fn write_bench(c: &mut Criterion) {
    let data = input();
    c.bench_function("block_write_lz4", |b| {
        b.iter(|| black_box(write_blocks(&data, CompressionMethod::Lz4)))
    });
    c.bench_function("block_write_none", |b| {
        b.iter(|| black_box(write_blocks(&data, CompressionMethod::None)))
    });
}

fn read_bench(c: &mut Criterion) {
    let framed = write_blocks(&input(), CompressionMethod::Lz4);
    c.bench_function("block_read_lz4", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(256 * 1024);
            BlockReader::new(framed.as_slice())
                .read_to_end(&mut out)
                .unwrap();
            black_box(out)
        })
    });
}

criterion_group! {
    name = block_benches;
    config = Criterion::default();
    targets = write_bench, read_bench
}

criterion_main!(block_benches);
