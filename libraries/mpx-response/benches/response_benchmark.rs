//! Performance benchmarks for frequency-response evaluation
//!
//! Run with: cargo bench -p mpx-response --bench response_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mpx_response::{
    analyze_chain, cascade, evaluate, reference_chain, FilterSpec, FrequencyGrid, PassbandBounds,
    PolyphaseUpsampler,
};

const FS: f64 = 48000.0;

fn sweep(points: usize) -> FrequencyGrid {
    FrequencyGrid::logarithmic(FS, 20.0, 15000.0, points).unwrap()
}

fn bench_stage_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("stage_evaluation");
    let grid = sweep(1000);
    group.throughput(Throughput::Elements(grid.len() as u64));

    for stage in reference_chain(FS).unwrap() {
        group.bench_with_input(
            BenchmarkId::new("1000 points", &stage.name),
            &stage.spec,
            |b, spec| b.iter(|| black_box(evaluate(black_box(spec), &grid).unwrap())),
        );
    }

    group.finish();
}

fn bench_upsampler_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsampler_taps");
    let grid = sweep(1000);

    for taps in [32, 96, 256, 1024] {
        let spec: FilterSpec = PolyphaseUpsampler::new(4, taps, 15000.0, FS).unwrap().into();
        group.bench_with_input(BenchmarkId::from_parameter(taps), &spec, |b, spec| {
            b.iter(|| black_box(evaluate(spec, &grid).unwrap()))
        });
    }

    group.finish();
}

fn bench_cascade(c: &mut Criterion) {
    let grid = sweep(1000);
    let responses: Vec<_> = reference_chain(FS)
        .unwrap()
        .iter()
        .map(|s| evaluate(&s.spec, &grid).unwrap())
        .collect();

    c.bench_function("cascade_3_stages", |b| {
        b.iter(|| black_box(cascade(black_box(&responses)).unwrap()))
    });
}

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_analysis");
    let chain = reference_chain(FS).unwrap();

    for points in [6, 100, 1000, 10000] {
        let grid = sweep(points);
        group.throughput(Throughput::Elements(points as u64));
        group.bench_with_input(BenchmarkId::from_parameter(points), &grid, |b, grid| {
            b.iter(|| black_box(analyze_chain(&chain, grid, PassbandBounds::default()).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_stage_evaluation,
    bench_upsampler_length,
    bench_cascade,
    bench_full_analysis
);
criterion_main!(benches);
