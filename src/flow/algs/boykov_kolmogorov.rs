//! Boykov-Kolmogorov: grow a search tree from each terminal, augment where the
//! trees meet, then repair the trees by adopting orphaned nodes.
//!
//! The search state ([`TreeSearch`]) outlives a single run so that
//! [`Kohli`](super::Kohli) can repair it after capacity updates instead of
//! starting over.

use std::collections::VecDeque;

use crate::capacity::{Capacity, min_cap};
use crate::flow::algs::ford_fulkerson::side_of;
use crate::flow::cut::source_reachable;
use crate::flow::network::{ResidualNetwork, saturate_terminal_paths};
use crate::flow::{MaxFlow, Origin, validate_residuals};
use crate::flow_error::FlowError;

/// Tree membership of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tree {
    Free,
    Source,
    Sink,
}

/// Link of a node to its tree.
///
/// `Arc(a)` names the arc from the node to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Parent {
    None,
    Terminal,
    Orphan,
    Arc(usize),
}

/// Counters of the last run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub augmentations: usize,
    pub orphans: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct TreeSearch<T> {
    pub(crate) tree: Vec<Tree>,
    pub(crate) parent: Vec<Parent>,
    /// Time stamp at which `dist` was known exact.
    ts: Vec<u64>,
    /// Distance to the terminal along tree links.
    dist: Vec<u32>,
    queued: Vec<bool>,
    active: VecDeque<usize>,
    orphans: VecDeque<usize>,
    time: u64,
    pub(crate) flow: T,
    pub(crate) stats: SearchStats,
}

impl<T: Capacity> TreeSearch<T> {
    pub(crate) fn new() -> Self {
        Self {
            tree: Vec::new(),
            parent: Vec::new(),
            ts: Vec::new(),
            dist: Vec::new(),
            queued: Vec::new(),
            active: VecDeque::new(),
            orphans: VecDeque::new(),
            time: 0,
            flow: T::zero(),
            stats: SearchStats::default(),
        }
    }

    /// Seed both trees from the terminal residuals of `g`.
    pub(crate) fn init<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &G, flow: T) {
        let n = g.node_count();
        self.tree = vec![Tree::Free; n];
        self.parent = vec![Parent::None; n];
        self.ts = vec![0; n];
        self.dist = vec![0; n];
        self.queued = vec![false; n];
        self.active.clear();
        self.orphans.clear();
        self.time = 0;
        self.flow = flow;
        self.stats = SearchStats::default();
        for v in 0..n {
            if g.is_excluded(v) {
                continue;
            }
            let (s, t) = g.terminal_residual(v);
            if s > T::zero() {
                self.attach_to_terminal(v, Tree::Source);
            } else if t > T::zero() {
                self.attach_to_terminal(v, Tree::Sink);
            }
        }
    }

    pub(crate) fn attach_to_terminal(&mut self, v: usize, tree: Tree) {
        self.tree[v] = tree;
        self.parent[v] = Parent::Terminal;
        self.ts[v] = self.time;
        self.dist[v] = 1;
        self.activate(v);
    }

    #[inline]
    pub(crate) fn activate(&mut self, v: usize) {
        if !self.queued[v] {
            self.queued[v] = true;
            self.active.push_back(v);
        }
    }

    #[inline]
    pub(crate) fn make_orphan(&mut self, v: usize) {
        self.parent[v] = Parent::Orphan;
        self.orphans.push_back(v);
    }

    /// Advance the clock so that distance marks from earlier adoptions expire.
    #[inline]
    pub(crate) fn tick(&mut self) {
        self.time += 1;
    }

    fn next_active(&mut self) -> Option<usize> {
        while let Some(v) = self.active.pop_front() {
            self.queued[v] = false;
            if self.tree[v] != Tree::Free {
                return Some(v);
            }
        }
        None
    }

    /// `true` if residual capacity lets the tree of `v` extend along `a` (an
    /// arc out of `v`).
    #[inline]
    fn can_grow<G: ResidualNetwork<T> + ?Sized>(g: &G, tree: Tree, a: usize) -> bool {
        match tree {
            Tree::Source => g.residual(a) > T::zero(),
            Tree::Sink => g.residual(g.sister(a)) > T::zero(),
            Tree::Free => false,
        }
    }

    /// Grow the tree of `u` by one layer. Returns the arc, directed from the
    /// source tree to the sink tree, where the trees touch.
    fn grow<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &G, u: usize) -> Option<usize> {
        let side = self.tree[u];
        for i in 0..g.degree(u) {
            let a = g.arc(u, i);
            if !Self::can_grow(g, side, a) {
                continue;
            }
            let j = g.head(a);
            if g.is_excluded(j) {
                continue;
            }
            match self.tree[j] {
                Tree::Free => {
                    self.tree[j] = side;
                    self.parent[j] = Parent::Arc(g.sister(a));
                    self.ts[j] = self.ts[u];
                    self.dist[j] = self.dist[u] + 1;
                    self.activate(j);
                }
                t if t == side => {}
                _ => {
                    return Some(if side == Tree::Source { a } else { g.sister(a) });
                }
            }
        }
        None
    }

    /// Push the bottleneck along the path through `bridge`; nodes whose tree
    /// link saturates become orphans.
    fn augment<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &mut G, bridge: usize) {
        let mut bottleneck = g.residual(bridge);
        let mut v = g.tail(bridge);
        loop {
            match self.parent[v] {
                Parent::Arc(a) => {
                    bottleneck = min_cap(bottleneck, g.residual(g.sister(a)));
                    v = g.head(a);
                }
                Parent::Terminal => {
                    bottleneck = min_cap(bottleneck, g.terminal_residual(v).0);
                    break;
                }
                Parent::None | Parent::Orphan => {
                    debug_assert!(false, "source path broken at node {v}");
                    return;
                }
            }
        }
        let mut v = g.head(bridge);
        loop {
            match self.parent[v] {
                Parent::Arc(a) => {
                    bottleneck = min_cap(bottleneck, g.residual(a));
                    v = g.head(a);
                }
                Parent::Terminal => {
                    bottleneck = min_cap(bottleneck, g.terminal_residual(v).1);
                    break;
                }
                Parent::None | Parent::Orphan => {
                    debug_assert!(false, "sink path broken at node {v}");
                    return;
                }
            }
        }

        g.push(bridge, bottleneck);
        let mut v = g.tail(bridge);
        while let Parent::Arc(a) = self.parent[v] {
            let down = g.sister(a);
            g.push(down, bottleneck);
            if g.residual(down) <= T::zero() {
                self.make_orphan(v);
            }
            v = g.head(a);
        }
        let (s, t) = g.terminal_residual(v);
        g.set_terminal_residual(v, s - bottleneck, t);
        if s - bottleneck <= T::zero() {
            self.make_orphan(v);
        }

        let mut v = g.head(bridge);
        while let Parent::Arc(a) = self.parent[v] {
            g.push(a, bottleneck);
            if g.residual(a) <= T::zero() {
                self.make_orphan(v);
            }
            v = g.head(a);
        }
        let (s, t) = g.terminal_residual(v);
        g.set_terminal_residual(v, s, t - bottleneck);
        if t - bottleneck <= T::zero() {
            self.make_orphan(v);
        }

        self.flow = self.flow + bottleneck;
        self.stats.augmentations += 1;
    }

    /// Length of the tree path from `j` to its terminal, or `None` if the path
    /// runs into an orphan. Nodes on a valid path get their distance marked.
    fn origin_distance<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &G, j: usize) -> Option<u32> {
        let mut d = 0;
        let mut k = j;
        loop {
            if self.ts[k] == self.time {
                d += self.dist[k];
                break;
            }
            d += 1;
            match self.parent[k] {
                Parent::Terminal => {
                    self.ts[k] = self.time;
                    self.dist[k] = 1;
                    break;
                }
                Parent::Arc(a) => k = g.head(a),
                Parent::None | Parent::Orphan => return None,
            }
        }
        let found = d;
        let mut k = j;
        while self.ts[k] != self.time {
            self.ts[k] = self.time;
            self.dist[k] = d;
            d -= 1;
            match self.parent[k] {
                Parent::Arc(a) => k = g.head(a),
                _ => break,
            }
        }
        Some(found)
    }

    fn process_orphan<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &G, v: usize) {
        let side = self.tree[v];
        let mut best: Option<(usize, u32)> = None;
        for i in 0..g.degree(v) {
            let a = g.arc(v, i);
            let j = g.head(a);
            if self.tree[j] != side || g.is_excluded(j) {
                continue;
            }
            // the link j -> v (source) or v -> j (sink) must carry residual
            let linked = match side {
                Tree::Source => g.residual(g.sister(a)) > T::zero(),
                Tree::Sink => g.residual(a) > T::zero(),
                Tree::Free => false,
            };
            if !linked {
                continue;
            }
            if let Some(d) = self.origin_distance(g, j) {
                if best.is_none_or(|(_, bd)| d < bd) {
                    best = Some((a, d));
                }
            }
        }

        if let Some((a, d)) = best {
            self.parent[v] = Parent::Arc(a);
            self.ts[v] = self.time;
            self.dist[v] = d + 1;
            return;
        }

        self.tree[v] = Tree::Free;
        self.parent[v] = Parent::None;
        self.release(g, v, side);
    }

    /// `v` left tree `side`: orphan its children there and wake every tree
    /// neighbour that can grow into it. Neighbours in the other tree count
    /// too; after an incremental update they may sit passive next to `v`.
    pub(crate) fn release<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &G, v: usize, side: Tree) {
        for i in 0..g.degree(v) {
            let a = g.arc(v, i);
            let j = g.head(a);
            if g.is_excluded(j) {
                continue;
            }
            let tree = self.tree[j];
            if tree != Tree::Free && Self::can_grow(g, tree, g.sister(a)) {
                self.activate(j);
            }
            if tree == side && self.parent[j] == Parent::Arc(g.sister(a)) {
                self.make_orphan(j);
            }
        }
    }

    pub(crate) fn adopt<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &G) {
        while let Some(v) = self.orphans.pop_front() {
            if self.parent[v] != Parent::Orphan {
                continue;
            }
            self.stats.orphans += 1;
            self.process_orphan(g, v);
        }
    }

    /// Grow, augment and adopt until the trees cannot meet.
    pub(crate) fn run<G: ResidualNetwork<T> + ?Sized>(&mut self, g: &mut G) {
        let mut current: Option<usize> = None;
        loop {
            let u = match current.take() {
                Some(u) if self.tree[u] != Tree::Free => u,
                _ => match self.next_active() {
                    Some(u) => u,
                    None => break,
                },
            };
            if let Some(bridge) = self.grow(g, u) {
                current = Some(u);
                self.tick();
                self.augment(g, bridge);
                self.adopt(g);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoykovKolmogorov<T, G> {
    network: G,
    search: TreeSearch<T>,
    source_side: Vec<bool>,
}

impl<T: Capacity, G: ResidualNetwork<T>> BoykovKolmogorov<T, G> {
    pub fn new(network: G) -> Self {
        Self {
            network,
            search: TreeSearch::new(),
            source_side: Vec::new(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.search.stats
    }

    pub fn into_network(self) -> G {
        self.network
    }
}

impl<T: Capacity, G: ResidualNetwork<T>> MaxFlow<T> for BoykovKolmogorov<T, G> {
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
        let direct = saturate_terminal_paths(&mut self.network);
        self.search.init(&self.network, direct);
        self.search.run(&mut self.network);
        self.source_side = source_reachable(&self.network);
        crate::debug_invariants!(validate_residuals(&self.network), "BoykovKolmogorov");
        log::debug!(
            "boykov-kolmogorov: flow {:?}, {:?}",
            self.search.flow,
            self.search.stats
        );
        self.search.flow
    }

    fn flow(&self) -> T {
        self.search.flow
    }

    fn node_origin(&self, v: usize) -> Origin {
        side_of(&self.network, &self.source_side, v)
    }
}
