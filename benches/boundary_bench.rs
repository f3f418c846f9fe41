// In benches/boundary_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use spz::{compress, decompress, Workers, ZstdCodec};

/// Generates a vector of highly compressible data.
fn generate_low_entropy_bytes(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let pattern = b"abcdefgABCDEFG12345";
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

/// Generates a vector of less compressible, more random-looking data.
fn generate_high_entropy_bytes(size: usize) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

const BENCH_DATA_SIZE: usize = 1 << 20; // 1 MB

fn bench_boundary(c: &mut Criterion) {
    let codec = ZstdCodec::default();
    let low_entropy_data = generate_low_entropy_bytes(BENCH_DATA_SIZE);
    let high_entropy_data = generate_high_entropy_bytes(BENCH_DATA_SIZE);

    let compressed_low = compress(&codec, &low_entropy_data, 3, Workers::SINGLE).unwrap();
    let compressed_high = compress(&codec, &high_entropy_data, 3, Workers::SINGLE).unwrap();

    let mut group = c.benchmark_group("Boundary Round Trip");
    group.throughput(criterion::Throughput::Bytes(BENCH_DATA_SIZE as u64));

    for (label, data) in [("Low Entropy", &low_entropy_data), ("High Entropy", &high_entropy_data)] {
        group.bench_function(format!("Compress L3 x1 ({})", label), |b| {
            b.iter(|| black_box(compress(&codec, black_box(data), 3, Workers::SINGLE)))
        });
        group.bench_function(format!("Compress L3 x4 ({})", label), |b| {
            b.iter(|| black_box(compress(&codec, black_box(data), 3, Workers::normalize(4))))
        });
        group.bench_function(format!("Compress L19 x1 ({})", label), |b| {
            b.iter(|| black_box(compress(&codec, black_box(data), 19, Workers::SINGLE)))
        });
    }

    group.bench_function("Decompress (Low Entropy)", |b| {
        b.iter(|| black_box(decompress(&codec, black_box(compressed_low.as_slice()), false)))
    });
    group.bench_function("Decompress (High Entropy)", |b| {
        b.iter(|| black_box(decompress(&codec, black_box(compressed_high.as_slice()), false)))
    });

    group.finish();
}

criterion_group!(benches, bench_boundary);
criterion_main!(benches);
