//! Residual reachability and cut evaluation.

use std::collections::VecDeque;

use crate::capacity::Capacity;
use crate::flow::Origin;
use crate::flow::network::ResidualNetwork;

/// Nodes reachable from the source through arcs of positive residual capacity.
pub fn source_reachable<T, G>(g: &G) -> Vec<bool>
where
    T: Capacity,
    G: ResidualNetwork<T> + ?Sized,
{
    let n = g.node_count();
    let mut seen = vec![false; n];
    let mut q = VecDeque::new();
    for v in 0..n {
        if !g.is_excluded(v) && g.terminal_residual(v).0 > T::zero() {
            seen[v] = true;
            q.push_back(v);
        }
    }
    while let Some(u) = q.pop_front() {
        for i in 0..g.degree(u) {
            let a = g.arc(u, i);
            if g.residual(a) > T::zero() {
                let j = g.head(a);
                if !seen[j] {
                    seen[j] = true;
                    q.push_back(j);
                }
            }
        }
    }
    seen
}

/// Nodes from which the sink is reachable through arcs of positive residual capacity.
pub fn sink_reaching<T, G>(g: &G) -> Vec<bool>
where
    T: Capacity,
    G: ResidualNetwork<T> + ?Sized,
{
    let n = g.node_count();
    let mut seen = vec![false; n];
    let mut q = VecDeque::new();
    for v in 0..n {
        if !g.is_excluded(v) && g.terminal_residual(v).1 > T::zero() {
            seen[v] = true;
            q.push_back(v);
        }
    }
    while let Some(u) = q.pop_front() {
        for i in 0..g.degree(u) {
            let a = g.arc(u, i);
            // arc head -> u
            if g.residual(g.sister(a)) > T::zero() {
                let j = g.head(a);
                if !seen[j] {
                    seen[j] = true;
                    q.push_back(j);
                }
            }
        }
    }
    seen
}

/// Total original capacity crossing from the source side to the sink side.
///
/// Terminal arcs count as crossing when their node is on the far side; arcs
/// into excluded nodes are ignored.
pub fn cut_capacity<T, G, F>(g: &G, origin: F) -> T
where
    T: Capacity,
    G: ResidualNetwork<T> + ?Sized,
    F: Fn(usize) -> Origin,
{
    let mut total = T::zero();
    for v in 0..g.node_count() {
        if g.is_excluded(v) {
            continue;
        }
        let (s, t) = g.terminal_caps(v);
        match origin(v) {
            Origin::Sink => total = total + s,
            Origin::Source => {
                total = total + t;
                for i in 0..g.degree(v) {
                    let a = g.arc(v, i);
                    let j = g.head(a);
                    if !g.is_excluded(j) && origin(j) == Origin::Sink {
                        total = total + g.capacity(a);
                    }
                }
            }
        }
    }
    total
}
