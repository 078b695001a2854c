use std::hint::black_box;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linecount_rs::count::{self, CountConfig, NoopObserver};

fn generate_text(lines: usize, words_per_line: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..lines {
        for j in 0..words_per_line {
            if j > 0 {
                data.push(b' ');
            }
            data.extend_from_slice(b"hello");
        }
        data.push(b'\n');
    }
    data
}

fn write_fixture(dir: &Path, size_mb: usize) -> std::path::PathBuf {
    let lines = size_mb * 1024 * 1024 / 12; // ~12 bytes per line
    let path = dir.join(format!("bench_{}mb.txt", size_mb));
    std::fs::write(&path, generate_text(lines, 2)).unwrap();
    path
}

fn bench_count_delimiters(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_delimiters");
    for size_mb in [1, 10] {
        let data = generate_text(size_mb * 1024 * 1024 / 12, 2);
        group.bench_with_input(
            BenchmarkId::new("memchr", format!("{}MB", size_mb)),
            &data,
            |b, data| b.iter(|| count::count_delimiters(black_box(data), b'\n')),
        );
    }
    group.finish();
}

fn bench_serial_vs_partitioned(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), 64);

    let mut group = c.benchmark_group("count_64MB");
    group.sample_size(10);
    group.bench_function("serial", |b| {
        b.iter(|| count::count_serial(black_box(&path), 1024 * 1024, b'\n').unwrap())
    });
    for (partitions, threads) in [(2, 2), (4, 4), (16, 4), (16, 8)] {
        let config = CountConfig::new(partitions, threads, 1024 * 1024);
        group.bench_with_input(
            BenchmarkId::new("partitioned", format!("s{}_t{}", partitions, threads)),
            &config,
            |b, config| {
                b.iter(|| {
                    count::count_with_observer(black_box(&path), config, &NoopObserver)
                        .unwrap()
                        .total
                })
            },
        );
    }
    group.finish();
}

fn bench_buffer_size(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), 16);

    let mut group = c.benchmark_group("buffer_size_16MB");
    group.sample_size(10);
    for buffer_kb in [4, 64, 1024, 4096] {
        let config = CountConfig::new(4, 4, buffer_kb * 1024);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}KB", buffer_kb)),
            &config,
            |b, config| {
                b.iter(|| {
                    count::count_with_observer(black_box(&path), config, &NoopObserver)
                        .unwrap()
                        .total
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_count_delimiters,
    bench_serial_vs_partitioned,
    bench_buffer_size,
);
criterion_main!(benches);
