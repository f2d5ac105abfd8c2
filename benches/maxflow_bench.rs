use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use gc_flow::prelude::*;

/// Segmentation-like lattice: a bright disc on a noisy background.
fn disc_grid(side: usize, seed: u64) -> GridGraph<i32, 2> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let nb = Neighbourhood::<2>::common(8, true).unwrap();
    let mut g = GridGraph::<i32, 2>::new([side, side], &nb).unwrap();
    g.set_neighbourhood_weights(&[8; 8]).unwrap();
    let c = side as f64 / 2.0;
    let mut src = Vec::with_capacity(side * side);
    let mut snk = Vec::with_capacity(side * side);
    for y in 0..side {
        for x in 0..side {
            let inside = (x as f64 - c).hypot(y as f64 - c) < side as f64 / 3.0;
            let noise = rng.gen_range(0..20);
            let (s, t) = if inside { (30 + noise, 10) } else { (10, 30 + noise) };
            src.push(s);
            snk.push(t);
        }
    }
    g.set_terminal_images(&src, &snk).unwrap();
    g
}

fn random_sparse(n: usize, degree: usize, seed: u64) -> ResidualGraph<i64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = ResidualGraph::with_capacity(n, n * degree);
    for v in 0..n {
        g.set_terminal_caps(v, rng.gen_range(0..50), rng.gen_range(0..50)).unwrap();
        for _ in 0..degree {
            let u = rng.gen_range(0..n);
            if u != v {
                g.add_arc_pair(v, u, rng.gen_range(1..20), rng.gen_range(0..20)).unwrap();
            }
        }
    }
    g
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid");
    for side in [32, 96] {
        let g = disc_grid(side, 42);
        for algorithm in Algorithm::GRID {
            group.bench_with_input(BenchmarkId::new(algorithm.name(), side), &g, |b, g| {
                b.iter(|| {
                    let mut s = grid_solver(algorithm, g.clone(), &FlowConfig::default()).unwrap();
                    s.find_max_flow()
                })
            });
        }
    }
    group.finish();
}

fn bench_general(c: &mut Criterion) {
    let mut group = c.benchmark_group("general");
    let g = random_sparse(2_000, 4, 7);
    for algorithm in Algorithm::ALL {
        if algorithm == Algorithm::FordFulkerson {
            continue;
        }
        group.bench_with_input(BenchmarkId::new(algorithm.name(), 2_000), &g, |b, g| {
            b.iter(|| general_solver(algorithm, g.clone(), &FlowConfig::default()).find_max_flow())
        });
    }
    group.finish();
}

fn bench_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental");
    let g = disc_grid(96, 1);
    let sites: Vec<usize> = g.nodes().collect();
    group.bench_function("kohli-terminal-updates", |b| {
        let mut s = Kohli::new(g.clone());
        s.find_max_flow();
        let mut rng = SmallRng::seed_from_u64(3);
        b.iter(|| {
            for _ in 0..32 {
                let v = sites[rng.gen_range(0..sites.len())];
                s.set_terminal_caps(v, rng.gen_range(0..50), rng.gen_range(0..50)).unwrap();
            }
            s.find_max_flow()
        })
    });
    group.finish();
}

criterion_group!(benches, bench_grid, bench_general, bench_incremental);
criterion_main!(benches);
