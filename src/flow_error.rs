//! FlowError: Unified error type for gc-flow public APIs
//!
//! Every construction and parameter check in the library reports through this
//! type before any solver work begins, so a rejected request never leaves a
//! half-solved network behind.

use thiserror::Error;

/// Unified error type for graph construction, capacity updates and solver selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A capacity was negative (or NaN for floating point capacities).
    #[error("Invalid argument: capacity must be non-negative, got {0}")]
    NegativeCapacity(String),
    /// A node index is outside of the graph.
    #[error("Invalid argument: node {node} out of range (graph has {count} nodes)")]
    NodeOutOfRange { node: usize, count: usize },
    /// An arc index is outside of the graph.
    #[error("Invalid argument: arc {arc} out of range (graph has {count} arcs)")]
    ArcOutOfRange { arc: usize, count: usize },
    /// Arcs must connect two distinct nodes.
    #[error("Invalid argument: self loop on node {0}")]
    SelfLoop(usize),
    /// A slice did not have the length implied by the graph.
    #[error("Invalid argument: expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// A lattice coordinate lies outside of the grid.
    #[error("Invalid argument: coordinate {coord:?} outside of grid {dims:?}")]
    CoordinateOutOfRange { coord: Vec<usize>, dims: Vec<usize> },
    /// A grid with a zero extent along some axis.
    #[error("Invalid argument: grid dimensions {0:?} must all be non-zero")]
    EmptyGrid(Vec<usize>),
    /// The algorithm identifier is not recognised.
    #[error("Invalid argument: unknown algorithm `{0}`")]
    UnknownAlgorithm(String),
    /// The algorithm exists but has no lattice-specialised form.
    #[error("Invalid argument: algorithm `{0}` is not available for grid graphs")]
    UnsupportedGridAlgorithm(String),
    /// The neighbourhood identifier or parameters are not recognised.
    #[error("Invalid argument: unknown neighbourhood `{0}`")]
    UnknownNeighbourhood(String),
    /// Grid graphs need each offset together with its mirrored offset.
    #[error("Invalid argument: neighbourhood offset {0:?} has no mirrored counterpart")]
    AsymmetricNeighbourhood(Vec<isize>),
    /// Mask or image slice does not match the grid size.
    #[error("Invalid argument: mask has {found} entries, grid has {expected} nodes")]
    MaskSizeMismatch { expected: usize, found: usize },
    /// A residual invariant does not hold; the network was mutated behind the solver's back.
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),
}

impl FlowError {
    /// `true` for every variant caused by malformed caller input.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, FlowError::InternalInconsistency(_))
    }
}
