//! Ford-Fulkerson: augment along any residual path (depth-first search).
//!
//! No bound on the number of augmentations beyond the flow value for integer
//! capacities. Kept as the correctness baseline for the faster strategies.

use crate::capacity::Capacity;
use crate::flow::algs::augmenting::{SearchOrder, augment_until_blocked};
use crate::flow::cut::source_reachable;
use crate::flow::network::{ResidualNetwork, saturate_terminal_paths};
use crate::flow::{MaxFlow, Origin, validate_residuals};
use crate::flow_error::FlowError;

#[derive(Debug, Clone)]
pub struct FordFulkerson<T, G> {
    network: G,
    flow: T,
    source_side: Vec<bool>,
    augmentations: usize,
}

impl<T: Capacity, G: ResidualNetwork<T>> FordFulkerson<T, G> {
    pub fn new(network: G) -> Self {
        Self {
            network,
            flow: T::zero(),
            source_side: Vec::new(),
            augmentations: 0,
        }
    }

    /// Augmenting paths used by the last solve.
    pub fn augmentations(&self) -> usize {
        self.augmentations
    }

    pub fn into_network(self) -> G {
        self.network
    }
}

impl<T: Capacity, G: ResidualNetwork<T>> MaxFlow<T> for FordFulkerson<T, G> {
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
        let (pushed, count) = augment_until_blocked(&mut self.network, SearchOrder::DepthFirst);
        self.flow = direct + pushed;
        self.augmentations = count;
        self.source_side = source_reachable(&self.network);
        crate::debug_invariants!(validate_residuals(&self.network), "FordFulkerson");
        log::debug!("ford-fulkerson: flow {:?} after {count} augmentations", self.flow);
        self.flow
    }

    fn flow(&self) -> T {
        self.flow
    }

    fn node_origin(&self, v: usize) -> Origin {
        side_of(&self.network, &self.source_side, v)
    }
}

/// Label of `v` given the source-side set of the last solve.
pub(crate) fn side_of<T, G>(g: &G, source_side: &[bool], v: usize) -> Origin
where
    T: Capacity,
    G: ResidualNetwork<T> + ?Sized,
{
    if let Some(o) = g.fixed_origin(v) {
        return o;
    }
    if source_side.get(v).copied().unwrap_or(false) {
        Origin::Source
    } else {
        Origin::Sink
    }
}
