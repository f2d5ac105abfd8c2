//! Dinitz: breadth-first level graph plus blocking flow, O(V²·E).

use std::collections::VecDeque;

use crate::capacity::{Capacity, min_cap};
use crate::flow::algs::ford_fulkerson::side_of;
use crate::flow::cut::source_reachable;
use crate::flow::network::{ResidualNetwork, saturate_terminal_paths};
use crate::flow::{MaxFlow, Origin, validate_residuals};
use crate::flow_error::FlowError;

/// Level of nodes not in the current level graph (or found dead).
const UNREACHED: u32 = 0;

#[derive(Debug, Clone)]
pub struct Dinitz<T, G> {
    network: G,
    flow: T,
    source_side: Vec<bool>,
    level: Vec<u32>,
    current: Vec<usize>,
    path: Vec<usize>,
    phases: usize,
}

impl<T: Capacity, G: ResidualNetwork<T>> Dinitz<T, G> {
    pub fn new(network: G) -> Self {
        Self {
            network,
            flow: T::zero(),
            source_side: Vec::new(),
            level: Vec::new(),
            current: Vec::new(),
            path: Vec::new(),
            phases: 0,
        }
    }

    /// Level graphs built by the last solve.
    pub fn phases(&self) -> usize {
        self.phases
    }

    pub fn into_network(self) -> G {
        self.network
    }

    /// Assign BFS levels from the source; `true` if some node with residual
    /// capacity to the sink was reached.
    fn build_levels(&mut self) -> bool {
        let g = &self.network;
        let n = g.node_count();
        self.level.clear();
        self.level.resize(n, UNREACHED);
        let mut queue = VecDeque::new();
        for v in 0..n {
            if !g.is_excluded(v) && g.terminal_residual(v).0 > T::zero() {
                self.level[v] = 1;
                queue.push_back(v);
            }
        }
        let mut reached_sink = false;
        while let Some(u) = queue.pop_front() {
            if g.terminal_residual(u).1 > T::zero() {
                reached_sink = true;
            }
            for i in 0..g.degree(u) {
                let a = g.arc(u, i);
                let j = g.head(a);
                if self.level[j] == UNREACHED && g.residual(a) > T::zero() {
                    self.level[j] = self.level[u] + 1;
                    queue.push_back(j);
                }
            }
        }
        reached_sink
    }

    #[inline]
    fn admissible(&self, a: usize, from: usize) -> bool {
        let g = &self.network;
        g.residual(a) > T::zero() && self.level[g.head(a)] == self.level[from] + 1
    }

    /// Saturate every shortest path of the current level graph.
    fn blocking_flow(&mut self) -> T {
        let n = self.network.node_count();
        self.current.clear();
        self.current.resize(n, 0);
        let mut total = T::zero();
        for s in 0..n {
            while self.level[s] == 1 && self.network.terminal_residual(s).0 > T::zero() {
                self.path.clear();
                let mut u = s;
                loop {
                    if self.network.terminal_residual(u).1 > T::zero() {
                        total = total + self.augment(s, u);
                        break;
                    }
                    let degree = self.network.degree(u);
                    while self.current[u] < degree
                        && !self.admissible(self.network.arc(u, self.current[u]), u)
                    {
                        self.current[u] += 1;
                    }
                    if self.current[u] < degree {
                        let a = self.network.arc(u, self.current[u]);
                        self.path.push(a);
                        u = self.network.head(a);
                        continue;
                    }
                    // dead end
                    self.level[u] = UNREACHED;
                    match self.path.pop() {
                        Some(a) => {
                            u = self.network.tail(a);
                            self.current[u] += 1;
                        }
                        None => break,
                    }
                }
            }
        }
        total
    }

    fn augment(&mut self, first: usize, last: usize) -> T {
        let g = &mut self.network;
        let mut bottleneck = min_cap(g.terminal_residual(first).0, g.terminal_residual(last).1);
        for &a in &self.path {
            bottleneck = min_cap(bottleneck, g.residual(a));
        }
        for &a in &self.path {
            g.push(a, bottleneck);
        }
        let (s, t) = g.terminal_residual(first);
        g.set_terminal_residual(first, s - bottleneck, t);
        let (s, t) = g.terminal_residual(last);
        g.set_terminal_residual(last, s, t - bottleneck);
        bottleneck
    }
}

impl<T: Capacity, G: ResidualNetwork<T>> MaxFlow<T> for Dinitz<T, G> {
    type Network = G;

    fn network(&self) -> &G {
        &self.network
    }

    fn set_terminal_caps(&mut self, v: usize, to_source: T, to_sink: T) -> Result<(), FlowError> {
        self.network.set_terminal_caps(v, to_source, to_sink)
    }

    fn set_arc_cap(&mut self, a: usize, cap: T) -> Result<(), FlowError> {
        self.network.set_arc_cap(a, cap)
    }

    fn find_max_flow(&mut self) -> T {
        self.network.reset();
        let mut flow = saturate_terminal_paths(&mut self.network);
        self.phases = 0;
        while self.build_levels() {
            self.phases += 1;
            flow = flow + self.blocking_flow();
        }
        self.flow = flow;
        self.source_side = source_reachable(&self.network);
        crate::debug_invariants!(validate_residuals(&self.network), "Dinitz");
        log::debug!("dinitz: flow {:?} in {} phases", self.flow, self.phases);
        self.flow
    }

    fn flow(&self) -> T {
        self.flow
    }

    fn node_origin(&self, v: usize) -> Origin {
        side_of(&self.network, &self.source_side, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::general::ResidualGraph;

    #[test]
    fn layered_network() {
        // two disjoint paths of length 2 plus a cross arc
        let mut g = ResidualGraph::<i64>::new(4);
        g.set_terminal_caps(0, 4, 0).unwrap();
        g.set_terminal_caps(1, 3, 0).unwrap();
        g.set_terminal_caps(2, 0, 5).unwrap();
        g.set_terminal_caps(3, 0, 1).unwrap();
        g.add_arc_pair(0, 2, 3, 0).unwrap();
        g.add_arc_pair(1, 3, 3, 0).unwrap();
        g.add_arc_pair(1, 2, 2, 0).unwrap();
        let mut d = Dinitz::new(g);
        // node 0 sends 3, node 1 sends 1 to 3 and 2 to 2
        assert_eq!(d.find_max_flow(), 6);
        assert!(d.phases() >= 1);
        assert_eq!(d.node_origin(0), Origin::Source);
        assert_eq!(d.node_origin(2), Origin::Sink);
    }

    #[test]
    fn floating_point_capacities() {
        let mut g = ResidualGraph::<f64>::new(3);
        g.set_terminal_caps(0, 1.5, 0.0).unwrap();
        g.set_terminal_caps(2, 0.0, 2.0).unwrap();
        g.add_arc_pair(0, 1, 1.25, 0.0).unwrap();
        g.add_arc_pair(1, 2, 0.75, 0.5).unwrap();
        let mut d = Dinitz::new(g);
        assert!((d.find_max_flow() - 0.75).abs() < 1e-12);
        assert_eq!(d.node_origin(1), Origin::Source);
    }

    #[test]
    fn no_terminals_no_flow() {
        let mut g = ResidualGraph::<i32>::new(2);
        g.add_arc_pair(0, 1, 3, 3).unwrap();
        let mut d = Dinitz::new(g);
        assert_eq!(d.find_max_flow(), 0);
        assert_eq!(d.phases(), 0);
        assert_eq!(d.node_origin(0), Origin::Sink);
    }
}
