//! The residual-network abstraction shared by every max-flow strategy.
//!
//! Nodes are dense indices `0..node_count()`. Directed arcs are dense indices
//! `0..arc_count()` and come in pairs: `sister(a)` is the reverse arc of `a`, and
//! pushing flow along `a` moves residual capacity from `a` to `sister(a)`.
//! Terminal arcs are not materialised; every node carries its capacity *to*
//! the source and *to* the sink plus the matching residuals.
//!
//! Some nodes may be *excluded* (lattice padding, masked voxels). An excluded
//! node never carries residual capacity, so solvers can ignore it entirely;
//! arcs touching it have zero residual.

use crate::capacity::Capacity;
use crate::flow::Origin;
use crate::flow_error::FlowError;

pub trait ResidualNetwork<T: Capacity> {
    /// Number of node slots (including excluded ones).
    fn node_count(&self) -> usize;

    /// Number of directed arc slots.
    fn arc_count(&self) -> usize;

    /// `true` for nodes that take no part in the optimization.
    #[inline]
    fn is_excluded(&self, _v: usize) -> bool {
        false
    }

    /// Fixed label of an excluded node that has one.
    #[inline]
    fn fixed_origin(&self, _v: usize) -> Option<Origin> {
        None
    }

    /// Number of outgoing arc slots of `v`.
    fn degree(&self, v: usize) -> usize;

    /// The `i`-th outgoing arc of `v`.
    fn arc(&self, v: usize, i: usize) -> usize;

    fn head(&self, a: usize) -> usize;

    fn tail(&self, a: usize) -> usize;

    fn sister(&self, a: usize) -> usize;

    /// Original capacity of arc `a` as seen by the solvers.
    fn capacity(&self, a: usize) -> T;

    fn residual(&self, a: usize) -> T;

    fn set_residual(&mut self, a: usize, r: T);

    /// Original capacities `(to_source, to_sink)` of node `v` as seen by the solvers.
    fn terminal_caps(&self, v: usize) -> (T, T);

    /// Residual terminal capacities `(to_source, to_sink)` of node `v`.
    fn terminal_residual(&self, v: usize) -> (T, T);

    fn set_terminal_residual(&mut self, v: usize, to_source: T, to_sink: T);

    /// Change the original terminal capacities of `v`; residuals are untouched.
    fn set_terminal_caps(&mut self, v: usize, to_source: T, to_sink: T) -> Result<(), FlowError>;

    /// Change the original capacity of arc `a`; residuals are untouched.
    fn set_arc_cap(&mut self, a: usize, cap: T) -> Result<(), FlowError>;

    /// Restore every residual to its original capacity.
    fn reset(&mut self) {
        for v in 0..self.node_count() {
            if self.is_excluded(v) {
                continue;
            }
            let (s, t) = self.terminal_caps(v);
            self.set_terminal_residual(v, s, t);
            for i in 0..self.degree(v) {
                let a = self.arc(v, i);
                let cap = self.capacity(a);
                self.set_residual(a, cap);
            }
        }
    }

    /// Move `delta` units of residual capacity from `a` to its sister.
    #[inline]
    fn push(&mut self, a: usize, delta: T) {
        let s = self.sister(a);
        let ra = self.residual(a);
        let rs = self.residual(s);
        self.set_residual(a, ra - delta);
        self.set_residual(s, rs + delta);
    }

    /// Number of nodes taking part in the optimization.
    fn live_node_count(&self) -> usize {
        (0..self.node_count()).filter(|&v| !self.is_excluded(v)).count()
    }

    fn check_node(&self, v: usize) -> Result<(), FlowError> {
        if v < self.node_count() {
            Ok(())
        } else {
            Err(FlowError::NodeOutOfRange {
                node: v,
                count: self.node_count(),
            })
        }
    }

    fn check_arc(&self, a: usize) -> Result<(), FlowError> {
        if a < self.arc_count() {
            Ok(())
        } else {
            Err(FlowError::ArcOutOfRange {
                arc: a,
                count: self.arc_count(),
            })
        }
    }
}

/// Route `min(to_source, to_sink)` of every live node straight through.
///
/// Returns the flow gained. Afterwards at most one terminal residual of each
/// node is non-zero.
pub(crate) fn saturate_terminal_paths<T, G>(g: &mut G) -> T
where
    T: Capacity,
    G: ResidualNetwork<T> + ?Sized,
{
    let mut flow = T::zero();
    for v in 0..g.node_count() {
        if g.is_excluded(v) {
            continue;
        }
        let (s, t) = g.terminal_residual(v);
        let m = crate::capacity::min_cap(s, t);
        if m > T::zero() {
            g.set_terminal_residual(v, s - m, t - m);
            flow = flow + m;
        }
    }
    flow
}
