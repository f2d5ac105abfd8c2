//! Preflow push-relabel (Goldberg & Tarjan), first phase only.
//!
//! The first phase builds a maximum preflow: every node that can still reach
//! the sink has zero excess. That is enough for the flow value and the minimum
//! cut; excess stranded on the source side is not returned to the source.
//! Nodes are labelled [`Origin::Source`] exactly when they cannot reach the
//! sink in the final residual network.
//!
//! The sink is implicit at height 0; a node pushes to it along its terminal
//! residual when at height 1. Nodes proven unable to reach the sink are lifted
//! to the `dead` height `live_nodes + 1` and never touched again.
//!
//! The order in which active nodes are discharged is the only difference
//! between [`PushRelabelFifo`] and [`PushRelabelHighestLevel`].

use std::collections::VecDeque;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::capacity::{Capacity, min_cap};
use crate::flow::algs::ford_fulkerson::side_of;
use crate::flow::config::PushRelabelConfig;
use crate::flow::cut::sink_reaching;
use crate::flow::network::{ResidualNetwork, saturate_terminal_paths};
use crate::flow::{MaxFlow, Origin, validate_residuals};
use crate::flow_error::FlowError;

pub mod fifo;
pub mod highest_level;

pub use fifo::FifoQueue;
pub use highest_level::HighestLevel;

/// FIFO selection of active nodes.
pub type PushRelabelFifo<T, G> = PushRelabel<T, G, FifoQueue>;

/// Highest-label selection of active nodes.
pub type PushRelabelHighestLevel<T, G> = PushRelabel<T, G, HighestLevel>;

const NIL: usize = usize::MAX;

/// Extra work charged per relabel on top of the node degree.
const RELABEL_WORK: usize = 12;

/// Selection rule for the next node to discharge.
///
/// Entries may go stale; the engine skips popped nodes that are no longer
/// active.
pub trait ActiveNodes: Debug + Default + Clone {
    /// Forget every node; heights will be below `levels`.
    fn clear(&mut self, levels: usize);

    fn insert(&mut self, v: usize, height: usize);

    fn pop(&mut self, height: &[usize]) -> Option<usize>;
}

/// Counters of the last solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRelabelStats {
    pub pushes: usize,
    pub relabels: usize,
    pub gaps: usize,
    pub global_relabels: usize,
}

/// Per-height doubly linked lists of the nodes below the dead height.
#[derive(Debug, Clone, Default)]
struct Layers {
    first: Vec<usize>,
    next: Vec<usize>,
    prev: Vec<usize>,
    count: Vec<usize>,
    top: usize,
}

impl Layers {
    fn clear(&mut self, nodes: usize, levels: usize) {
        self.first.clear();
        self.first.resize(levels, NIL);
        self.count.clear();
        self.count.resize(levels, 0);
        self.next.clear();
        self.next.resize(nodes, NIL);
        self.prev.clear();
        self.prev.resize(nodes, NIL);
        self.top = 0;
    }

    fn insert(&mut self, v: usize, h: usize) {
        let f = self.first[h];
        self.next[v] = f;
        self.prev[v] = NIL;
        if f != NIL {
            self.prev[f] = v;
        }
        self.first[h] = v;
        self.count[h] += 1;
        self.top = self.top.max(h);
    }

    fn remove(&mut self, v: usize, h: usize) {
        let (p, n) = (self.prev[v], self.next[v]);
        if p == NIL {
            self.first[h] = n;
        } else {
            self.next[p] = n;
        }
        if n != NIL {
            self.prev[n] = p;
        }
        self.count[h] -= 1;
    }
}

#[derive(Debug, Clone)]
pub struct PushRelabel<T, G, S> {
    network: G,
    config: PushRelabelConfig,
    height: Vec<usize>,
    excess: Vec<T>,
    current: Vec<usize>,
    layers: Layers,
    active: S,
    dead: usize,
    work: usize,
    flow: T,
    source_side: Vec<bool>,
    stats: PushRelabelStats,
}

impl<T: Capacity, G: ResidualNetwork<T>, S: ActiveNodes> PushRelabel<T, G, S> {
    pub fn new(network: G) -> Self {
        Self::with_config(network, PushRelabelConfig::default())
    }

    pub fn with_config(network: G, config: PushRelabelConfig) -> Self {
        Self {
            network,
            config,
            height: Vec::new(),
            excess: Vec::new(),
            current: Vec::new(),
            layers: Layers::default(),
            active: S::default(),
            dead: 0,
            work: 0,
            flow: T::zero(),
            source_side: Vec::new(),
            stats: PushRelabelStats::default(),
        }
    }

    pub fn config(&self) -> &PushRelabelConfig {
        &self.config
    }

    pub fn stats(&self) -> PushRelabelStats {
        self.stats
    }

    pub fn into_network(self) -> G {
        self.network
    }

    /// Saturate every source arc and give every live node its starting height.
    fn init_preflow(&mut self) {
        let n = self.network.node_count();
        self.dead = self.network.live_node_count() + 1;
        self.height = vec![self.dead; n];
        self.excess = vec![T::zero(); n];
        self.current = vec![0; n];
        self.work = 0;
        self.stats = PushRelabelStats::default();
        for v in 0..n {
            if self.network.is_excluded(v) {
                continue;
            }
            let (s, t) = self.network.terminal_residual(v);
            self.excess[v] = s;
            self.network.set_terminal_residual(v, T::zero(), t);
        }
        if self.config.global_relabel {
            self.global_relabel();
        } else {
            // heights of 1 are a valid labeling with the sink at 0
            self.layers.clear(n, self.dead + 1);
            self.active.clear(self.dead + 1);
            for v in 0..n {
                if !self.network.is_excluded(v) {
                    self.height[v] = 1;
                    self.layers.insert(v, 1);
                    if self.excess[v] > T::zero() {
                        self.active.insert(v, 1);
                    }
                }
            }
        }
    }

    /// Exact distances to the sink by a reverse breadth-first search.
    fn global_relabel(&mut self) {
        let g = &self.network;
        let n = g.node_count();
        self.height.iter_mut().for_each(|h| *h = self.dead);
        let mut queue = VecDeque::new();
        for v in 0..n {
            if !g.is_excluded(v) && g.terminal_residual(v).1 > T::zero() {
                self.height[v] = 1;
                queue.push_back(v);
            }
        }
        while let Some(u) = queue.pop_front() {
            let d = self.height[u] + 1;
            for i in 0..g.degree(u) {
                let a = g.arc(u, i);
                let j = g.head(a);
                if self.height[j] == self.dead
                    && !g.is_excluded(j)
                    && g.residual(g.sister(a)) > T::zero()
                {
                    self.height[j] = d;
                    queue.push_back(j);
                }
            }
        }
        self.layers.clear(n, self.dead + 1);
        self.active.clear(self.dead + 1);
        for v in 0..n {
            let h = self.height[v];
            if h < self.dead {
                self.current[v] = 0;
                self.layers.insert(v, h);
                if self.excess[v] > T::zero() {
                    self.active.insert(v, h);
                }
            }
        }
        self.work = 0;
        self.stats.global_relabels += 1;
    }

    fn relabel(&mut self, v: usize) {
        let g = &self.network;
        let old = self.height[v];
        let mut h = self.dead;
        if g.terminal_residual(v).1 > T::zero() {
            h = 1;
        }
        for i in 0..g.degree(v) {
            let a = g.arc(v, i);
            if g.residual(a) > T::zero() {
                h = h.min(self.height[g.head(a)] + 1);
            }
        }
        let h = h.min(self.dead);
        self.work += g.degree(v) + RELABEL_WORK;
        self.stats.relabels += 1;
        self.current[v] = 0;

        if self.config.gap_heuristic && self.layers.count[old] == 1 {
            self.gap(old);
            return;
        }
        self.layers.remove(v, old);
        self.height[v] = h;
        if h < self.dead {
            self.layers.insert(v, h);
        }
    }

    /// No node is left at height `level`: nothing at or above it can reach the
    /// sink any more.
    fn gap(&mut self, level: usize) {
        for h in level..=self.layers.top {
            let mut v = self.layers.first[h];
            while v != NIL {
                self.height[v] = self.dead;
                v = self.layers.next[v];
            }
            self.layers.first[h] = NIL;
            self.layers.count[h] = 0;
        }
        self.layers.top = level.saturating_sub(1);
        self.stats.gaps += 1;
    }

    /// Push the excess of `v` until it is gone or `v` is found dead.
    fn discharge(&mut self, v: usize) {
        let zero = T::zero();
        while self.excess[v] > zero && self.height[v] < self.dead {
            let (s, t) = self.network.terminal_residual(v);
            if self.height[v] == 1 && t > zero {
                let d = min_cap(self.excess[v], t);
                self.network.set_terminal_residual(v, s, t - d);
                self.excess[v] = self.excess[v] - d;
                self.flow = self.flow + d;
                self.stats.pushes += 1;
                continue;
            }
            if self.current[v] == self.network.degree(v) {
                self.relabel(v);
                continue;
            }
            let a = self.network.arc(v, self.current[v]);
            let j = self.network.head(a);
            let r = self.network.residual(a);
            if r > zero && self.height[v] == self.height[j] + 1 {
                let d = min_cap(self.excess[v], r);
                let idle = self.excess[j] <= zero;
                self.network.push(a, d);
                self.excess[v] = self.excess[v] - d;
                self.excess[j] = self.excess[j] + d;
                self.stats.pushes += 1;
                if idle {
                    self.active.insert(j, self.height[j]);
                }
            } else {
                self.current[v] += 1;
            }
        }
    }

    fn work_limit(&self) -> usize {
        let size = self.network.live_node_count() + self.network.arc_count();
        (self.config.global_relabel_frequency.max(0.0) * size as f64) as usize
    }
}

impl<T: Capacity, G: ResidualNetwork<T>, S: ActiveNodes> MaxFlow<T> for PushRelabel<T, G, S> {
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
        self.flow = saturate_terminal_paths(&mut self.network);
        self.init_preflow();
        let limit = self.work_limit();
        while let Some(v) = self.active.pop(&self.height) {
            if self.excess[v] <= T::zero() || self.height[v] >= self.dead {
                continue;
            }
            self.discharge(v);
            if self.config.global_relabel && self.work > limit {
                self.global_relabel();
            }
        }
        self.source_side = sink_reaching(&self.network).into_iter().map(|r| !r).collect();
        crate::debug_invariants!(validate_residuals(&self.network), "PushRelabel");
        log::debug!("push-relabel: flow {:?}, {:?}", self.flow, self.stats);
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

    fn bottleneck_chain() -> ResidualGraph<i32> {
        // 0 -> 1 -> 2 -> 3, the middle arc is the bottleneck
        let mut g = ResidualGraph::new(4);
        g.set_terminal_caps(0, 8, 0).unwrap();
        g.set_terminal_caps(3, 0, 8).unwrap();
        g.add_arc_pair(0, 1, 5, 0).unwrap();
        g.add_arc_pair(1, 2, 2, 0).unwrap();
        g.add_arc_pair(2, 3, 5, 0).unwrap();
        g
    }

    fn configs() -> Vec<PushRelabelConfig> {
        let mut out = Vec::new();
        for global_relabel in [true, false] {
            for gap_heuristic in [true, false] {
                out.push(PushRelabelConfig {
                    global_relabel,
                    gap_heuristic,
                    ..PushRelabelConfig::default()
                });
            }
        }
        out
    }

    #[test]
    fn fifo_every_config() {
        for cfg in configs() {
            let mut pr = PushRelabelFifo::with_config(bottleneck_chain(), cfg.clone());
            assert_eq!(pr.find_max_flow(), 2, "{cfg:?}");
            // the maximal source side stops right before the bottleneck
            let labels: Vec<_> = (0..4).map(|v| pr.node_origin(v)).collect();
            assert_eq!(
                labels,
                vec![Origin::Source, Origin::Source, Origin::Sink, Origin::Sink]
            );
        }
    }

    #[test]
    fn highest_level_every_config() {
        for cfg in configs() {
            let mut pr = PushRelabelHighestLevel::with_config(bottleneck_chain(), cfg.clone());
            assert_eq!(pr.find_max_flow(), 2, "{cfg:?}");
            assert_eq!(pr.node_origin(1), Origin::Source);
            assert_eq!(pr.node_origin(2), Origin::Sink);
        }
    }

    #[test]
    fn gap_lifts_stranded_excess() {
        let mut pr = PushRelabelFifo::with_config(
            bottleneck_chain(),
            PushRelabelConfig {
                global_relabel: false,
                ..PushRelabelConfig::default()
            },
        );
        pr.find_max_flow();
        assert!(pr.stats().gaps >= 1);
        assert!(pr.stats().relabels >= 1);
        assert_eq!(pr.stats().global_relabels, 0);
    }

    #[test]
    fn solve_is_repeatable() {
        let mut pr = PushRelabelHighestLevel::new(bottleneck_chain());
        assert_eq!(pr.find_max_flow(), 2);
        pr.set_terminal_caps(0, 1, 0).unwrap();
        assert_eq!(pr.find_max_flow(), 1);
        assert_eq!(pr.find_max_flow(), 1);
        assert!(pr.stats().global_relabels >= 1);
    }
}
