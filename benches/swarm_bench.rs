//! Criterion benchmarks for the swarm solver and its operators.
//!
//! Instances are random points on a grid, so costs are Euclidean and
//! symmetric.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_numflow::random::create_rng;
use u_swarm_tsp::constructive::savings_tour;
use u_swarm_tsp::cost::{CostMatrix, CostOracle};
use u_swarm_tsp::swarm::operators::{crossover, mutate};
use u_swarm_tsp::swarm::{SwarmConfig, SwarmRunner};

// ===========================================================================
// Instances
// ===========================================================================

fn euclidean_instance(n: usize, seed: u64) -> CostMatrix {
    let mut rng = create_rng(seed);
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
        .collect();
    CostMatrix::from_fn(n, |i, j| {
        let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
        (dx * dx + dy * dy).sqrt()
    })
    .expect("finite coordinates")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_evaluate_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_cost");

    for &n in &[20usize, 100, 500] {
        let oracle = CostOracle::new(euclidean_instance(n, 42));
        let tour = oracle.random_tour(&mut create_rng(7));
        group.bench_with_input(BenchmarkId::from_parameter(n), &tour, |b, t| {
            b.iter(|| black_box(oracle.evaluate_cost(black_box(t))))
        });
    }
    group.finish();
}

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");

    for &n in &[20usize, 100, 500] {
        let oracle = CostOracle::new(euclidean_instance(n, 42));
        let mut rng = create_rng(7);
        let dad = oracle.random_tour(&mut rng);
        let mom = oracle.random_tour(&mut rng);

        group.bench_with_input(BenchmarkId::new("mutate", n), &dad, |b, t| {
            b.iter(|| black_box(mutate(black_box(t), &mut rng)))
        });
        group.bench_with_input(BenchmarkId::new("crossover", n), &(dad, mom), |b, (d, m)| {
            b.iter(|| black_box(crossover(black_box(d), black_box(m), &mut rng)))
        });
    }
    group.finish();
}

fn bench_savings(c: &mut Criterion) {
    let mut group = c.benchmark_group("savings_tour");
    group.sample_size(20);

    for &n in &[20usize, 100, 300] {
        let oracle = CostOracle::new(euclidean_instance(n, 42));
        group.bench_with_input(BenchmarkId::from_parameter(n), &oracle, |b, o| {
            b.iter(|| black_box(savings_tour(black_box(o))))
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("swarm_solve");
    group.sample_size(10);

    for &n in &[10usize, 30] {
        let matrix = euclidean_instance(n, 42);
        let config = SwarmConfig::for_instance(n)
            .with_iterations(100)
            .with_max_epochs(10)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(matrix, config),
            |b, (m, c)| {
                b.iter(|| {
                    let result = SwarmRunner::run(m.clone(), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate_cost,
    bench_operators,
    bench_savings,
    bench_solve
);
criterion_main!(benches);
