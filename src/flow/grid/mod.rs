//! Lattice graphs and their readout.
//!
//! The grid solvers are the generic strategies instantiated over [`GridGraph`];
//! see [`grid_solver`](crate::flow::grid_solver).

use crate::capacity::Capacity;
use crate::flow::{MaxFlow, Origin};

pub mod lattice;
pub mod mask;

pub use lattice::GridGraph;
pub use mask::{Mask, MaskMode, Masked, Unmasked};

/// Label of every site after a solve, in [`GridGraph::nodes`] order.
pub fn segmentation<T, const N: usize, M, S>(solver: &S) -> Vec<Origin>
where
    T: Capacity,
    M: MaskMode,
    S: MaxFlow<T, Network = GridGraph<T, N, M>> + ?Sized,
{
    solver.network().nodes().map(|v| solver.node_origin(v)).collect()
}
