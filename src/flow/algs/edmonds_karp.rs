//! Edmonds-Karp: augment along shortest residual paths (breadth-first search),
//! at most O(V·E) augmentations.

use crate::capacity::Capacity;
use crate::flow::algs::augmenting::{SearchOrder, augment_until_blocked};
use crate::flow::algs::ford_fulkerson::side_of;
use crate::flow::cut::source_reachable;
use crate::flow::network::{ResidualNetwork, saturate_terminal_paths};
use crate::flow::{MaxFlow, Origin, validate_residuals};
use crate::flow_error::FlowError;

#[derive(Debug, Clone)]
pub struct EdmondsKarp<T, G> {
    network: G,
    flow: T,
    source_side: Vec<bool>,
    augmentations: usize,
}

impl<T: Capacity, G: ResidualNetwork<T>> EdmondsKarp<T, G> {
    pub fn new(network: G) -> Self {
        Self {
            network,
            flow: T::zero(),
            source_side: Vec::new(),
            augmentations: 0,
        }
    }

    pub fn augmentations(&self) -> usize {
        self.augmentations
    }

    pub fn into_network(self) -> G {
        self.network
    }
}

impl<T: Capacity, G: ResidualNetwork<T>> MaxFlow<T> for EdmondsKarp<T, G> {
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
        let (pushed, count) = augment_until_blocked(&mut self.network, SearchOrder::BreadthFirst);
        self.flow = direct + pushed;
        self.augmentations = count;
        self.source_side = source_reachable(&self.network);
        crate::debug_invariants!(validate_residuals(&self.network), "EdmondsKarp");
        log::debug!("edmonds-karp: flow {:?} after {count} augmentations", self.flow);
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
    fn classic_clrs_network() {
        // CLRS figure 26.1 with s = terminal into 0/1, t = terminal out of 2/3.
        let mut g = ResidualGraph::<i32>::new(4);
        g.set_terminal_caps(0, 16, 0).unwrap();
        g.set_terminal_caps(1, 13, 0).unwrap();
        g.set_terminal_caps(2, 0, 20).unwrap();
        g.set_terminal_caps(3, 0, 4).unwrap();
        g.add_arc_pair(0, 2, 12, 0).unwrap();
        g.add_arc_pair(1, 0, 4, 0).unwrap();
        g.add_arc_pair(1, 3, 14, 0).unwrap();
        g.add_arc_pair(2, 1, 9, 0).unwrap();
        g.add_arc_pair(3, 2, 7, 0).unwrap();
        let mut ek = EdmondsKarp::new(g);
        assert_eq!(ek.find_max_flow(), 23);
        assert_eq!(ek.node_origin(0), Origin::Source);
        assert_eq!(ek.node_origin(1), Origin::Source);
        assert_eq!(ek.node_origin(3), Origin::Source);
        assert_eq!(ek.node_origin(2), Origin::Sink);
    }
}
