#![allow(dead_code)]
use gc_flow::flow::cut::{sink_reaching, source_reachable};
use gc_flow::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random graph with `n` nodes; each ordered pair gets an arc with probability
/// `density`. Capacities are drawn from `0..=max_cap`.
pub fn random_graph(seed: u64, n: usize, density: f64, max_cap: i64) -> ResidualGraph<i64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = ResidualGraph::new(n);
    for v in 0..n {
        let s = if rng.gen_bool(0.3) { rng.gen_range(0..=max_cap) } else { 0 };
        let t = if rng.gen_bool(0.3) { rng.gen_range(0..=max_cap) } else { 0 };
        g.set_terminal_caps(v, s, t).unwrap();
    }
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen_bool(density) {
                let fwd = rng.gen_range(0..=max_cap);
                let rev = if rng.gen_bool(0.5) { rng.gen_range(0..=max_cap) } else { 0 };
                g.add_arc_pair(u, v, fwd, rev).unwrap();
            }
        }
    }
    g
}

/// Random 2D lattice with per-arc capacities.
pub fn random_grid<M: gc_flow::flow::grid::MaskMode>(
    seed: u64,
    dims: [usize; 2],
    nb: &Neighbourhood<2>,
    max_cap: i64,
) -> GridGraph<i64, 2, M> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = GridGraph::<i64, 2, M>::new(dims, nb).unwrap();
    let weights: Vec<i64> = (0..nb.len()).map(|_| rng.gen_range(0..=max_cap)).collect();
    g.set_neighbourhood_weights(&weights).unwrap();
    let nodes: Vec<usize> = g.nodes().collect();
    for &v in &nodes {
        let s = if rng.gen_bool(0.4) { rng.gen_range(0..=2 * max_cap) } else { 0 };
        let t = if rng.gen_bool(0.4) { rng.gen_range(0..=2 * max_cap) } else { 0 };
        g.set_terminal_caps(v, s, t).unwrap();
        // explicit weight image on top of the neighbourhood weights
        for k in 0..nb.len() {
            if rng.gen_bool(0.5) {
                g.set_arc_cap(g.arc_id(v, k), rng.gen_range(0..=max_cap)).unwrap();
            }
        }
    }
    g
}

/// Labels of nodes `0..n`.
pub fn labels<T: Capacity, S: MaxFlow<T> + ?Sized>(solver: &S, n: usize) -> Vec<Origin> {
    (0..n).map(|v| solver.node_origin(v)).collect()
}

/// Minimal source set of the minimum cut, computed from an Edmonds-Karp solve.
pub fn minimal_source_set(g: &ResidualGraph<i64>) -> (i64, Vec<Origin>) {
    let mut ek = EdmondsKarp::new(g.clone());
    let flow = ek.find_max_flow();
    let side = source_reachable(ek.network());
    (flow, side.into_iter().map(to_origin).collect())
}

/// Maximal source set of the minimum cut, computed from an Edmonds-Karp solve.
pub fn maximal_source_set(g: &ResidualGraph<i64>) -> (i64, Vec<Origin>) {
    let mut ek = EdmondsKarp::new(g.clone());
    let flow = ek.find_max_flow();
    let side = sink_reaching(ek.network());
    (flow, side.into_iter().map(|r| to_origin(!r)).collect())
}

/// Reference labels for `algorithm`: push-relabel reports the maximal source
/// set, every other strategy the minimal one.
pub fn reference(algorithm: Algorithm, g: &ResidualGraph<i64>) -> (i64, Vec<Origin>) {
    if matches!(
        algorithm,
        Algorithm::PushRelabelFifo | Algorithm::PushRelabelHighestLevel
    ) {
        maximal_source_set(g)
    } else {
        minimal_source_set(g)
    }
}

fn to_origin(source: bool) -> Origin {
    if source { Origin::Source } else { Origin::Sink }
}
