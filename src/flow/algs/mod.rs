//! Max-flow strategies, all generic over the [`ResidualNetwork`](crate::flow::ResidualNetwork)
//! they solve.

mod augmenting;
pub mod boykov_kolmogorov;
pub mod dinitz;
pub mod edmonds_karp;
pub mod ford_fulkerson;
pub mod kohli;
pub mod push_relabel;

pub use boykov_kolmogorov::{BoykovKolmogorov, SearchStats};
pub use dinitz::Dinitz;
pub use edmonds_karp::EdmondsKarp;
pub use ford_fulkerson::FordFulkerson;
pub use kohli::Kohli;
pub use push_relabel::{
    PushRelabel, PushRelabelFifo, PushRelabelHighestLevel, PushRelabelStats,
};
