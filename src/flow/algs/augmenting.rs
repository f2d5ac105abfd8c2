//! Path search and augmentation shared by Ford-Fulkerson and Edmonds-Karp.

use std::collections::VecDeque;

use crate::capacity::{Capacity, min_cap};
use crate::flow::network::ResidualNetwork;

/// Predecessor marker of a node entered directly from the source.
pub(crate) const FROM_SOURCE: usize = usize::MAX;

/// Order in which the search frontier is expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchOrder {
    DepthFirst,
    BreadthFirst,
}

/// Scratch buffers reused across searches.
#[derive(Debug, Default)]
pub(crate) struct PathSearch {
    pred: Vec<usize>,
    seen: Vec<bool>,
    frontier: VecDeque<usize>,
}

impl PathSearch {
    /// Find a source-to-sink path of positive residual capacity and return its
    /// last node; the path is recorded as predecessor arcs.
    pub(crate) fn find<T, G>(&mut self, g: &G, order: SearchOrder) -> Option<usize>
    where
        T: Capacity,
        G: ResidualNetwork<T> + ?Sized,
    {
        let n = g.node_count();
        self.pred.resize(n, FROM_SOURCE);
        self.seen.clear();
        self.seen.resize(n, false);
        self.frontier.clear();
        for v in 0..n {
            if !g.is_excluded(v) && g.terminal_residual(v).0 > T::zero() {
                self.seen[v] = true;
                self.pred[v] = FROM_SOURCE;
                self.frontier.push_back(v);
            }
        }
        loop {
            let u = match order {
                SearchOrder::DepthFirst => self.frontier.pop_back(),
                SearchOrder::BreadthFirst => self.frontier.pop_front(),
            }?;
            if g.terminal_residual(u).1 > T::zero() {
                return Some(u);
            }
            for i in 0..g.degree(u) {
                let a = g.arc(u, i);
                if g.residual(a) > T::zero() {
                    let j = g.head(a);
                    if !self.seen[j] {
                        self.seen[j] = true;
                        self.pred[j] = a;
                        self.frontier.push_back(j);
                    }
                }
            }
        }
    }

    /// Push the bottleneck capacity along the path ending at `last`.
    pub(crate) fn augment<T, G>(&self, g: &mut G, last: usize) -> T
    where
        T: Capacity,
        G: ResidualNetwork<T> + ?Sized,
    {
        let mut bottleneck = g.terminal_residual(last).1;
        let mut v = last;
        while self.pred[v] != FROM_SOURCE {
            let a = self.pred[v];
            bottleneck = min_cap(bottleneck, g.residual(a));
            v = g.tail(a);
        }
        let first = v;
        bottleneck = min_cap(bottleneck, g.terminal_residual(first).0);

        let (s, t) = g.terminal_residual(last);
        g.set_terminal_residual(last, s, t - bottleneck);
        let mut v = last;
        while self.pred[v] != FROM_SOURCE {
            let a = self.pred[v];
            g.push(a, bottleneck);
            v = g.tail(a);
        }
        let (s, t) = g.terminal_residual(first);
        g.set_terminal_residual(first, s - bottleneck, t);
        bottleneck
    }
}

/// Repeat search and augmentation until no path is left.
///
/// Returns the flow pushed (on top of whatever the caller already routed) and
/// the number of augmentations.
pub(crate) fn augment_until_blocked<T, G>(g: &mut G, order: SearchOrder) -> (T, usize)
where
    T: Capacity,
    G: ResidualNetwork<T> + ?Sized,
{
    let mut search = PathSearch::default();
    let mut flow = T::zero();
    let mut count = 0;
    while let Some(last) = search.find(g, order) {
        flow = flow + search.augment(g, last);
        count += 1;
    }
    (flow, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::general::ResidualGraph;

    #[test]
    fn breadth_first_prefers_short_paths() {
        // 0 -> 3 directly, or 0 -> 1 -> 2 -> 3
        let mut g = ResidualGraph::<i32>::new(4);
        g.set_terminal_caps(0, 1, 0).unwrap();
        g.set_terminal_caps(3, 0, 1).unwrap();
        g.add_arc_pair(0, 1, 1, 0).unwrap();
        g.add_arc_pair(1, 2, 1, 0).unwrap();
        g.add_arc_pair(2, 3, 1, 0).unwrap();
        let direct = g.add_arc_pair(0, 3, 1, 0).unwrap();
        g.reset();
        let mut search = PathSearch::default();
        let last = search.find(&g, SearchOrder::BreadthFirst).unwrap();
        assert_eq!(last, 3);
        assert_eq!(search.augment(&mut g, last), 1);
        assert_eq!(g.residual(direct), 0);
        assert!(search.find(&g, SearchOrder::BreadthFirst).is_none());
    }
}
