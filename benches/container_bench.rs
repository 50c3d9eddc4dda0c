//! Benchmarks for chunkweave.
//!
//! Run with:
//!     cargo bench

use std::sync::Arc;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use chunkweave::{ChunkBuilder, ChunkIndexer, ChunkType, PNG_SIGNATURE, inject, write_container};

/// Builds a container with one header, `count` data chunks of `size` bytes and a trailer.
fn container(count: usize, size: usize) -> Vec<u8> {
    let builder = ChunkBuilder::default();
    let payload: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();

    let mut out = PNG_SIGNATURE.to_vec();
    out.extend_from_slice(builder.build(ChunkType::IHDR, &[0u8; 13]).unwrap().as_bytes());
    for _ in 0..count {
        out.extend_from_slice(builder.build(ChunkType::IDAT, &payload).unwrap().as_bytes());
    }
    out.extend_from_slice(builder.build(ChunkType::IEND, b"").unwrap().as_bytes());
    out
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    // Many small chunks stress the header walk; few large ones show payloads are skipped
    for (count, size) in [(10_000, 64), (100, 64 * 1024), (4, 8 * 1024 * 1024)] {
        let data = Arc::new(container(count, size));

        group.throughput(Throughput::Elements(count as u64 + 2));
        group.bench_with_input(format!("{count}x{size}"), &data, |b, data| {
            b.iter(|| {
                let seq = ChunkIndexer::default().scan(Arc::clone(black_box(data))).unwrap();
                black_box(seq.len())
            });
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let builder = ChunkBuilder::default();

    for size in [16, 4 * 1024, 1024 * 1024] {
        let text = vec![b'a'; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(format!("text_{size}"), &text, |b, text| {
            b.iter(|| black_box(builder.build_text_chunk(black_box(text)).unwrap()));
        });
    }

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    let data = container(16, 64 * 1024);
    let seq = ChunkIndexer::default().scan(Arc::new(data.clone())).unwrap();
    let text = ChunkBuilder::default().build_text_chunk(b"Comment\0bench").unwrap();

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("round_trip", |b| {
        let mut out = Vec::with_capacity(data.len());
        b.iter(|| {
            out.clear();
            black_box(write_container(&mut out, seq.signature(), &seq).unwrap())
        });
    });

    group.bench_function("inject", |b| {
        let mut out = Vec::with_capacity(data.len() + text.len());
        b.iter(|| {
            out.clear();
            black_box(inject(&mut out, &seq, &text).unwrap())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scan, bench_build, bench_write);
criterion_main!(benches);
