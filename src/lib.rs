#![cfg_attr(docsrs, feature(doc_cfg))]
//! # gc-flow
//!
//! gc-flow computes maximum flows and minimum s/t-cuts over weighted graphs. It
//! is meant as the inner solver of graph-cut energy minimization, where the
//! same graph is solved over and over with slightly different capacities.
//!
//! ## Features
//! - Seven strategies behind one [`MaxFlow`](flow::MaxFlow) contract:
//!   Ford-Fulkerson, Edmonds-Karp, Dinitz, Boykov-Kolmogorov, Kohli
//!   (incremental), push-relabel with FIFO and with highest-level selection
//! - Explicit sparse graphs ([`ResidualGraph`](flow::general::ResidualGraph))
//!   and N-dimensional lattices with implicit arcs
//!   ([`GridGraph`](flow::grid::GridGraph)), optionally masked
//! - Incremental reoptimization after terminal or pairwise capacity changes
//! - Integer or floating-point capacities
//! - Optional `rayon` feature for solving independent instances in parallel
//!
//! ## Usage
//!
//! ```
//! use gc_flow::prelude::*;
//!
//! // source -> 0 -> 1 -> sink
//! let mut g = ResidualGraph::<i64>::new(2);
//! g.set_terminal_caps(0, 5, 0)?;
//! g.set_terminal_caps(1, 0, 5)?;
//! g.add_arc_pair(0, 1, 2, 0)?;
//!
//! let mut solver = general_solver(Algorithm::Kohli, g, &FlowConfig::default());
//! assert_eq!(solver.find_max_flow(), 2);
//! assert_eq!(solver.node_origin(0), Origin::Source);
//! assert_eq!(solver.node_origin(1), Origin::Sink);
//!
//! // only the changed node is revisited
//! solver.set_terminal_caps(0, 1, 0)?;
//! assert_eq!(solver.find_max_flow(), 1);
//! # Ok::<(), FlowError>(())
//! ```
//!
//! ## Invariants
//!
//! Residual invariants are checked after every solve in debug builds, or in
//! release builds with the `strict-invariants` / `check-invariants` features.
//! A violation is a bug and panics.

pub mod capacity;
pub mod debug_invariants;
pub mod energy;
pub mod flow;
pub mod flow_error;

#[cfg(feature = "rayon")]
pub mod batch;

pub use debug_invariants::DebugInvariants;
pub use flow_error::FlowError;

static_assertions::assert_impl_all!(flow::general::ResidualGraph<f64>: Send, Sync, Clone);
static_assertions::assert_impl_all!(flow::grid::GridGraph<i32, 3, flow::grid::Masked>: Send, Sync, Clone);
static_assertions::assert_impl_all!(flow::Origin: Copy, Send, Sync);

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::capacity::Capacity;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::energy::Neighbourhood;
    pub use crate::flow::algs::{
        BoykovKolmogorov, Dinitz, EdmondsKarp, FordFulkerson, Kohli, PushRelabelFifo,
        PushRelabelHighestLevel,
    };
    pub use crate::flow::general::ResidualGraph;
    pub use crate::flow::grid::{GridGraph, Mask, Masked, Unmasked, segmentation};
    pub use crate::flow::{
        Algorithm, FlowConfig, MaxFlow, Origin, PushRelabelConfig, ResidualNetwork,
        general_solver, grid_solver,
    };
    pub use crate::flow_error::FlowError;
}
