// Processing benchmarks
// Author: Gabriel Demetrios Lafis

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rust_streaming_stats::{
    data::ValueSet,
    processing::{Emitter, Reducer, Statistic, StatsProcessor},
};

fn make_values(n: usize) -> Vec<f64> {
    // deterministic pseudo-random spread
    (0..n).map(|i| ((i * 7919) % 10007) as f64 * 0.37).collect()
}

fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for size in [1_000usize, 100_000] {
        let values = ValueSet::from(make_values(size));

        for statistic in Statistic::ALL {
            let processor = StatsProcessor::new(statistic);
            group.bench_with_input(
                BenchmarkId::new(statistic.name(), size),
                &values,
                |b, values| b.iter(|| processor.compute(black_box(values)).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let raw: String = make_values(50_000)
        .iter()
        .map(|v| format!("{}\n", v))
        .collect();

    c.bench_function("map_reduce_median_50k", |b| {
        b.iter(|| {
            let mut records = Vec::new();
            Emitter::default().run(raw.as_bytes(), &mut records).unwrap();

            let mut output = Vec::new();
            Reducer::from_selector("median")
                .unwrap()
                .run(records.as_slice(), &mut output)
                .unwrap();
            black_box(output)
        })
    });
}

criterion_group!(benches, bench_statistics, bench_pipeline);
criterion_main!(benches);
