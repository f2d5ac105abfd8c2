//! Solve independent instances in parallel.
//!
//! Solvers share no state, so a batch of them (one per image slice, one per
//! model hypothesis, ...) can run on the rayon thread pool as is.

use rayon::prelude::*;

use crate::capacity::Capacity;
use crate::flow::MaxFlow;

/// Run [`MaxFlow::find_max_flow`] on every solver; flows are returned in input order.
pub fn solve_all<T, S>(solvers: &mut [S]) -> Vec<T>
where
    T: Capacity,
    S: MaxFlow<T> + Send,
{
    log::debug!("batch solve of {} instances", solvers.len());
    solvers.par_iter_mut().map(|s| s.find_max_flow()).collect()
}

/// Same as [`solve_all`] for boxed solvers of mixed strategies.
pub fn solve_all_boxed<T, N>(solvers: &mut [Box<dyn MaxFlow<T, Network = N> + Send>]) -> Vec<T>
where
    T: Capacity,
    N: crate::flow::ResidualNetwork<T>,
{
    log::debug!("batch solve of {} boxed instances", solvers.len());
    solvers.par_iter_mut().map(|s| s.find_max_flow()).collect()
}
