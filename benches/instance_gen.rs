//! Benchmarks for CPU-side startup work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ringfield::field::{FieldConfig, ParticleField};

fn bench_instance_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("instance_generation");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let config = FieldConfig::new(1.0, 2.0);
            b.iter(|| black_box(ParticleField::new(config.clone(), count).unwrap()))
        });
    }

    group.finish();
}

fn bench_positions_flat(c: &mut Criterion) {
    let field = ParticleField::new(FieldConfig::new(1.0, 2.0), 10_000).unwrap();

    c.bench_function("positions_flat_10k", |b| {
        b.iter(|| black_box(field.positions_flat()))
    });
}

criterion_group!(benches, bench_instance_generation, bench_positions_flat);
criterion_main!(benches);
