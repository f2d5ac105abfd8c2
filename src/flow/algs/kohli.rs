//! Dynamic graph cuts (Kohli & Torr): Boykov-Kolmogorov whose search trees and
//! residuals survive capacity updates.
//!
//! Updates after a solve are applied to the residual network directly. A
//! terminal capacity that drops below the flow it already carries is fixed by
//! adding the same amount to both terminal residuals of the node, which leaves
//! the minimum cut unchanged and lowers the flow value by that amount. An arc
//! capacity that drops below its flow has the excess cancelled and rerouted to
//! the terminals of its endpoints. Only the touched nodes are revisited on the
//! next solve.

use crate::capacity::{Capacity, max_cap, min_cap};
use crate::flow::algs::boykov_kolmogorov::{Parent, SearchStats, Tree, TreeSearch};
use crate::flow::algs::ford_fulkerson::side_of;
use crate::flow::cut::source_reachable;
use crate::flow::network::{ResidualNetwork, saturate_terminal_paths};
use crate::flow::{MaxFlow, Origin, validate_residuals};
use crate::flow_error::FlowError;

#[derive(Debug, Clone)]
pub struct Kohli<T, G> {
    network: G,
    search: TreeSearch<T>,
    source_side: Vec<bool>,
    solved: bool,
    changed: Vec<usize>,
    marked: Vec<bool>,
}

impl<T: Capacity, G: ResidualNetwork<T>> Kohli<T, G> {
    pub fn new(network: G) -> Self {
        Self {
            network,
            search: TreeSearch::new(),
            source_side: Vec::new(),
            solved: false,
            changed: Vec::new(),
            marked: Vec::new(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.search.stats
    }

    /// Nodes touched since the last solve.
    pub fn pending_updates(&self) -> usize {
        self.changed.len()
    }

    pub fn into_network(self) -> G {
        self.network
    }

    fn mark(&mut self, v: usize) {
        if !self.network.is_excluded(v) && !self.marked[v] {
            self.marked[v] = true;
            self.changed.push(v);
        }
    }

    /// Add `ds`/`dt` to the terminal residuals of `v`, keeping both
    /// non-negative, then route what can go straight through.
    fn shift_terminal(&mut self, v: usize, ds: T, dt: T) {
        let zero = T::zero();
        let (s, t) = self.network.terminal_residual(v);
        let (mut s, mut t) = (s + ds, t + dt);
        let k = max_cap(max_cap(-s, -t), zero);
        if k > zero {
            s = s + k;
            t = t + k;
            self.search.flow = self.search.flow - k;
        }
        let m = min_cap(s, t);
        if m > zero {
            s = s - m;
            t = t - m;
            self.search.flow = self.search.flow + m;
        }
        self.network.set_terminal_residual(v, s, t);
    }

    /// Capacity of `a` changed from `old` to its current value.
    fn repair_arc(&mut self, a: usize, old: T) {
        let zero = T::zero();
        let r = self.network.residual(a) + (self.network.capacity(a) - old);
        if r >= zero {
            self.network.set_residual(a, r);
            return;
        }
        let excess = -r;
        let b = self.network.sister(a);
        self.network.set_residual(a, zero);
        let rb = self.network.residual(b);
        self.network.set_residual(b, rb - excess);
        self.search.flow = self.search.flow - excess;
        let (u, v) = (self.network.tail(a), self.network.head(a));
        self.shift_terminal(u, excess, zero);
        self.shift_terminal(v, zero, excess);
    }

    /// Bring the search trees in line with the updated residuals.
    fn reuse_trees(&mut self) {
        let zero = T::zero();
        let changed = std::mem::take(&mut self.changed);
        for &v in &changed {
            self.marked[v] = false;
            let (s, t) = self.network.terminal_residual(v);
            let wanted = if s > zero {
                Some(Tree::Source)
            } else if t > zero {
                Some(Tree::Sink)
            } else {
                None
            };
            match wanted {
                Some(tree) => {
                    let old = self.search.tree[v];
                    if old != tree && old != Tree::Free {
                        self.search.release(&self.network, v, old);
                    }
                    self.search.attach_to_terminal(v, tree);
                }
                None => match self.search.parent[v] {
                    Parent::Terminal => self.search.make_orphan(v),
                    Parent::Arc(p) => {
                        let valid = match self.search.tree[v] {
                            Tree::Source => self.network.residual(self.network.sister(p)) > zero,
                            Tree::Sink => self.network.residual(p) > zero,
                            Tree::Free => false,
                        };
                        if valid {
                            self.search.activate(v);
                        } else {
                            self.search.make_orphan(v);
                        }
                    }
                    Parent::None | Parent::Orphan => {}
                },
            }
        }
        self.search.tick();
        self.search.adopt(&self.network);
        // touched nodes may have gained residual arcs out of their tree
        for &v in &changed {
            if self.search.tree[v] != Tree::Free {
                self.search.activate(v);
            }
        }
        self.changed = changed;
        self.changed.clear();
    }
}

impl<T: Capacity, G: ResidualNetwork<T>> MaxFlow<T> for Kohli<T, G> {
    type Network = G;

    fn network(&self) -> &G {
        &self.network
    }

    fn set_terminal_caps(&mut self, v: usize, to_source: T, to_sink: T) -> Result<(), FlowError> {
        self.network.check_node(v)?;
        if !self.solved || self.network.is_excluded(v) {
            return self.network.set_terminal_caps(v, to_source, to_sink);
        }
        let (s0, t0) = self.network.terminal_caps(v);
        self.network.set_terminal_caps(v, to_source, to_sink)?;
        let (s1, t1) = self.network.terminal_caps(v);
        self.shift_terminal(v, s1 - s0, t1 - t0);
        self.mark(v);
        Ok(())
    }

    fn set_arc_cap(&mut self, a: usize, cap: T) -> Result<(), FlowError> {
        if !self.solved {
            return self.network.set_arc_cap(a, cap);
        }
        self.network.check_arc(a)?;
        let (u, v) = (self.network.tail(a), self.network.head(a));
        match (self.network.is_excluded(u), self.network.is_excluded(v)) {
            (false, false) => {
                let old = self.network.capacity(a);
                self.network.set_arc_cap(a, cap)?;
                self.repair_arc(a, old);
                self.mark(u);
                self.mark(v);
            }
            (true, true) => self.network.set_arc_cap(a, cap)?,
            // an arc to a fixed node only shows up in the terminal capacities
            // of its live endpoint
            (tail_excluded, _) => {
                let live = if tail_excluded { v } else { u };
                let (s0, t0) = self.network.terminal_caps(live);
                self.network.set_arc_cap(a, cap)?;
                let (s1, t1) = self.network.terminal_caps(live);
                self.shift_terminal(live, s1 - s0, t1 - t0);
                self.mark(live);
            }
        }
        Ok(())
    }

    fn find_max_flow(&mut self) -> T {
        if !self.solved {
            self.network.reset();
            let direct = saturate_terminal_paths(&mut self.network);
            self.search.init(&self.network, direct);
            self.marked = vec![false; self.network.node_count()];
            self.changed.clear();
            self.solved = true;
        } else if self.changed.is_empty() {
            return self.search.flow;
        } else {
            log::trace!("kohli: reusing trees for {} updated nodes", self.changed.len());
            self.reuse_trees();
        }
        self.search.run(&mut self.network);
        self.source_side = source_reachable(&self.network);
        crate::debug_invariants!(validate_residuals(&self.network), "Kohli");
        log::debug!("kohli: flow {:?}, {:?}", self.search.flow, self.search.stats);
        self.search.flow
    }

    fn flow(&self) -> T {
        self.search.flow
    }

    fn node_origin(&self, v: usize) -> Origin {
        side_of(&self.network, &self.source_side, v)
    }

    fn is_incremental(&self) -> bool {
        true
    }
}
