//! Optimizer Benchmarks
//!
//! Throughput of the vertex cache optimizer and the FIFO evaluator on
//! regular grids.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use tricache_core::{
    IndexedMesh, MeshSnapshot, NullObserver, OptimizerConfig, ScoringMode, VertexCacheOptimizer,
    compute_acmr,
};

fn bench_optimize_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize_grid");
    let optimizer = VertexCacheOptimizer::new(OptimizerConfig::default()).unwrap();

    for size in [16u32, 64, 128].iter() {
        let mesh = IndexedMesh::grid(*size, *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &mesh, |b, mesh| {
            b.iter(|| {
                black_box(optimizer.optimize_with_observer(mesh, NullObserver).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_optimize_combined(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize_combined");
    let config = OptimizerConfig::default().with_scoring(ScoringMode::Combined);
    let optimizer = VertexCacheOptimizer::new(config).unwrap();

    for size in [16u32, 64].iter() {
        let mesh = IndexedMesh::grid(*size, *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &mesh, |b, mesh| {
            b.iter(|| {
                black_box(optimizer.optimize_with_observer(mesh, NullObserver).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_compute_acmr(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_acmr");

    for size in [16u32, 64, 128].iter() {
        let mesh = IndexedMesh::grid(*size, *size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &mesh, |b, mesh| {
            b.iter(|| black_box(compute_acmr(mesh.indices(), 32)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_optimize_grid,
    bench_optimize_combined,
    bench_compute_acmr,
);

criterion_main!(benches);
