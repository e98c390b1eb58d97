use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wobble_core::aggregate::{AggregateOptions, aggregate};
use wobble_core::metrics::Degree;
use wobble_core::{ConcordanceCounter, Graph, GraphBuilder};

const SIZES: [usize; 3] = [100, 500, 2_000];

fn scores(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| f64::from(rng.gen_range(0u32..50))).collect()
}

fn random_graph(n: usize, m: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = GraphBuilder::default();
    let mut added = 0;
    while added < m {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if builder.add_edge(&a.to_string(), &b.to_string()) {
            added += 1;
        }
    }
    builder.build()
}

fn bench_concordance(c: &mut Criterion) {
    let mut group = c.benchmark_group("concordance.count");
    let counter = ConcordanceCounter::exact();

    for n in SIZES {
        let x = scores(n, 1);
        let y = scores(n, 2);
        group.throughput(Throughput::Elements((n * (n - 1) / 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &(x, y), |b, (x, y)| {
            b.iter(|| black_box(counter.count_slices(x, y)));
        });
    }

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate.degree");
    group.sample_size(20);

    for n in [200, 1_000] {
        let graph = random_graph(n, n * 4, 7);
        let options = AggregateOptions {
            trials: 16,
            ..AggregateOptions::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| black_box(aggregate(graph, &Degree::default(), &options)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_concordance, bench_aggregate);
criterion_main!(benches);
