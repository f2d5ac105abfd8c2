//! Max-flow / min-cut solvers.
//!
//! Every strategy implements [`MaxFlow`] over a [`ResidualNetwork`]: either the
//! explicit [`ResidualGraph`](general::ResidualGraph) or the implicit lattice
//! [`GridGraph`](grid::GridGraph). A caller builds a network, hands it to a
//! solver (directly or through [`general_solver`] / [`grid_solver`]), calls
//! [`MaxFlow::find_max_flow`] and reads back per-node labels with
//! [`MaxFlow::node_origin`].
//!
//! Only [`Kohli`](algs::Kohli) reuses its state across capacity updates; all
//! other solvers restart from the original capacities on every solve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::capacity::Capacity;
use crate::flow_error::FlowError;

pub mod algs;
pub mod config;
pub mod cut;
pub mod general;
pub mod grid;
pub mod network;

pub use config::{FlowConfig, PushRelabelConfig};
pub use network::ResidualNetwork;

use self::algs::{
    BoykovKolmogorov, Dinitz, EdmondsKarp, FordFulkerson, Kohli, PushRelabelFifo,
    PushRelabelHighestLevel,
};
use self::general::ResidualGraph;
use self::grid::{GridGraph, MaskMode};

/// Terminal a node is connected to after a solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Source side of the minimum cut.
    Source,
    /// Sink side of the minimum cut.
    Sink,
}

/// The solver contract.
pub trait MaxFlow<T: Capacity> {
    /// Network type the solver owns.
    type Network: ResidualNetwork<T>;

    /// Read-only view of the owned network.
    fn network(&self) -> &Self::Network;

    /// Change the terminal capacities of node `v`.
    fn set_terminal_caps(&mut self, v: usize, to_source: T, to_sink: T) -> Result<(), FlowError>;

    /// Change the capacity of the directed arc `a`.
    fn set_arc_cap(&mut self, a: usize, cap: T) -> Result<(), FlowError>;

    /// Compute the maximum flow for the current capacities.
    fn find_max_flow(&mut self) -> T;

    /// Flow value of the last solve (zero before the first one).
    fn flow(&self) -> T;

    /// Side of the minimum cut node `v` ended up on.
    fn node_origin(&self, v: usize) -> Origin;

    /// `true` if the solver reuses its state across capacity updates.
    fn is_incremental(&self) -> bool {
        false
    }
}

/// Selectable max-flow strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    FordFulkerson,
    EdmondsKarp,
    Dinitz,
    BoykovKolmogorov,
    Kohli,
    PushRelabelFifo,
    PushRelabelHighestLevel,
}

impl Algorithm {
    /// Every strategy available for generic graphs.
    pub const ALL: [Algorithm; 7] = [
        Algorithm::FordFulkerson,
        Algorithm::EdmondsKarp,
        Algorithm::Dinitz,
        Algorithm::BoykovKolmogorov,
        Algorithm::Kohli,
        Algorithm::PushRelabelFifo,
        Algorithm::PushRelabelHighestLevel,
    ];

    /// Strategies with a lattice-specialised form.
    pub const GRID: [Algorithm; 3] = [
        Algorithm::Kohli,
        Algorithm::PushRelabelFifo,
        Algorithm::PushRelabelHighestLevel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::FordFulkerson => "ford-fulkerson",
            Algorithm::EdmondsKarp => "edmonds-karp",
            Algorithm::Dinitz => "dinitz",
            Algorithm::BoykovKolmogorov => "boykov-kolmogorov",
            Algorithm::Kohli => "kohli",
            Algorithm::PushRelabelFifo => "push-relabel-fifo",
            Algorithm::PushRelabelHighestLevel => "push-relabel-highest-level",
        }
    }

    pub fn supports_grid(self) -> bool {
        Self::GRID.contains(&self)
    }

    pub fn is_incremental(self) -> bool {
        matches!(self, Algorithm::Kohli)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FlowError;

    /// Accepts the kebab-case names, case-insensitively, with `_` or `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|a| a.name() == key)
            .ok_or_else(|| FlowError::UnknownAlgorithm(s.to_string()))
    }
}

/// Boxed solver over a generic graph.
pub type GeneralSolver<T> = Box<dyn MaxFlow<T, Network = ResidualGraph<T>> + Send>;

/// Boxed solver over a lattice.
pub type GridSolver<T, const N: usize, M> = Box<dyn MaxFlow<T, Network = GridGraph<T, N, M>> + Send>;

/// Instantiate `algorithm` over a generic graph.
pub fn general_solver<T: Capacity>(
    algorithm: Algorithm,
    graph: ResidualGraph<T>,
    config: &FlowConfig,
) -> GeneralSolver<T> {
    log::debug!(
        "general solver {algorithm} over {} nodes / {} arcs",
        graph.node_count(),
        graph.arc_count()
    );
    match algorithm {
        Algorithm::FordFulkerson => Box::new(FordFulkerson::new(graph)),
        Algorithm::EdmondsKarp => Box::new(EdmondsKarp::new(graph)),
        Algorithm::Dinitz => Box::new(Dinitz::new(graph)),
        Algorithm::BoykovKolmogorov => Box::new(BoykovKolmogorov::new(graph)),
        Algorithm::Kohli => Box::new(Kohli::new(graph)),
        Algorithm::PushRelabelFifo => {
            Box::new(PushRelabelFifo::with_config(graph, config.push_relabel.clone()))
        }
        Algorithm::PushRelabelHighestLevel => Box::new(PushRelabelHighestLevel::with_config(
            graph,
            config.push_relabel.clone(),
        )),
    }
}

/// Instantiate `algorithm` over a lattice; only [`Algorithm::GRID`] are accepted.
pub fn grid_solver<T: Capacity, const N: usize, M: MaskMode>(
    algorithm: Algorithm,
    grid: GridGraph<T, N, M>,
    config: &FlowConfig,
) -> Result<GridSolver<T, N, M>, FlowError> {
    log::debug!(
        "grid solver {algorithm} over {:?} (masked: {})",
        grid.dims(),
        M::ENABLED
    );
    Ok(match algorithm {
        Algorithm::Kohli => Box::new(Kohli::new(grid)),
        Algorithm::PushRelabelFifo => {
            Box::new(PushRelabelFifo::with_config(grid, config.push_relabel.clone()))
        }
        Algorithm::PushRelabelHighestLevel => Box::new(PushRelabelHighestLevel::with_config(
            grid,
            config.push_relabel.clone(),
        )),
        other => return Err(FlowError::UnsupportedGridAlgorithm(other.name().to_string())),
    })
}

/// Check the residual invariants of a network.
///
/// Terminal residuals are non-negative; for every arc whose endpoints both take
/// part in the optimization the residual is non-negative and the residuals of
/// an arc and its sister add up to their original capacities.
pub fn validate_residuals<T, G>(g: &G) -> Result<(), FlowError>
where
    T: Capacity,
    G: ResidualNetwork<T> + ?Sized,
{
    let zero = T::zero();
    let rel_tol = <T as num_traits::NumCast>::from(1e-9).unwrap_or_else(T::zero);
    for v in 0..g.node_count() {
        if g.is_excluded(v) {
            continue;
        }
        let (s, t) = g.terminal_residual(v);
        if !(s >= zero && t >= zero) {
            return Err(FlowError::InternalInconsistency(format!(
                "node {v} has terminal residuals ({s:?}, {t:?})"
            )));
        }
        for i in 0..g.degree(v) {
            let a = g.arc(v, i);
            if g.is_excluded(g.head(a)) {
                continue;
            }
            let r = g.residual(a);
            if !(r >= zero) {
                return Err(FlowError::InternalInconsistency(format!(
                    "arc {a} has residual {r:?}"
                )));
            }
            let b = g.sister(a);
            let total = g.capacity(a) + g.capacity(b);
            let diff = (g.residual(a) + g.residual(b) - total).abs();
            if diff > total.abs() * rel_tol {
                return Err(FlowError::InternalInconsistency(format!(
                    "arc pair ({a}, {b}) residuals do not sum to {total:?}"
                )));
            }
        }
    }
    Ok(())
}
