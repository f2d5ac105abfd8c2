//! Explicit residual graph over a dense node set.
//!
//! Arcs are stored in pairs: the forward arc of a pair has an even id and its
//! sister is `id ^ 1`. Each node keeps the list of its outgoing arc ids, in
//! insertion order.

use crate::capacity::{Capacity, check_capacity};
use crate::debug_invariants::DebugInvariants;
use crate::flow::network::ResidualNetwork;
use crate::flow::validate_residuals;
use crate::flow_error::FlowError;

/// Identifier of a directed arc.
pub type ArcId = usize;

/// Generic graph with per-arc original capacities and residuals.
#[derive(Debug, Clone)]
pub struct ResidualGraph<T> {
    /// Outgoing arc ids per node.
    out: Vec<Vec<ArcId>>,
    head: Vec<usize>,
    cap: Vec<T>,
    res: Vec<T>,
    source_cap: Vec<T>,
    sink_cap: Vec<T>,
    source_res: Vec<T>,
    sink_res: Vec<T>,
}

impl<T: Capacity> Default for ResidualGraph<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: Capacity> ResidualGraph<T> {
    /// Graph with `node_count` isolated nodes and zero terminal capacities.
    pub fn new(node_count: usize) -> Self {
        Self {
            out: vec![Vec::new(); node_count],
            head: Vec::new(),
            cap: Vec::new(),
            res: Vec::new(),
            source_cap: vec![T::zero(); node_count],
            sink_cap: vec![T::zero(); node_count],
            source_res: vec![T::zero(); node_count],
            sink_res: vec![T::zero(); node_count],
        }
    }

    /// Same as [`ResidualGraph::new`] with room reserved for `arc_pairs` pairs.
    pub fn with_capacity(node_count: usize, arc_pairs: usize) -> Self {
        let mut g = Self::new(node_count);
        g.head.reserve(2 * arc_pairs);
        g.cap.reserve(2 * arc_pairs);
        g.res.reserve(2 * arc_pairs);
        g
    }

    /// Append a node and return its index.
    pub fn add_node(&mut self) -> usize {
        self.out.push(Vec::new());
        self.source_cap.push(T::zero());
        self.sink_cap.push(T::zero());
        self.source_res.push(T::zero());
        self.sink_res.push(T::zero());
        self.out.len() - 1
    }

    /// Add the arc `u -> v` with capacity `cap_uv` and its sister `v -> u`
    /// with capacity `cap_vu`. Returns the id of `u -> v`.
    pub fn add_arc_pair(&mut self, u: usize, v: usize, cap_uv: T, cap_vu: T) -> Result<ArcId, FlowError> {
        self.check_node(u)?;
        self.check_node(v)?;
        if u == v {
            return Err(FlowError::SelfLoop(u));
        }
        check_capacity(cap_uv)?;
        check_capacity(cap_vu)?;
        let a = self.head.len();
        self.head.extend([v, u]);
        self.cap.extend([cap_uv, cap_vu]);
        self.res.extend([cap_uv, cap_vu]);
        self.out[u].push(a);
        self.out[v].push(a + 1);
        Ok(a)
    }

    /// Set both original capacities of the pair containing `a`.
    pub fn set_arc_pair_caps(&mut self, a: ArcId, cap_fwd: T, cap_rev: T) -> Result<(), FlowError> {
        self.check_arc(a)?;
        check_capacity(cap_fwd)?;
        check_capacity(cap_rev)?;
        self.cap[a] = cap_fwd;
        self.cap[a ^ 1] = cap_rev;
        Ok(())
    }

    /// First arc `u -> v`, if any.
    pub fn find_arc(&self, u: usize, v: usize) -> Option<ArcId> {
        self.out.get(u)?.iter().copied().find(|&a| self.head[a] == v)
    }

    /// Number of arc pairs.
    #[inline]
    pub fn arc_pair_count(&self) -> usize {
        self.head.len() / 2
    }

    /// Outgoing arc ids of `v`.
    #[inline]
    pub fn out_arcs(&self, v: usize) -> &[ArcId] {
        &self.out[v]
    }
}

impl<T: Capacity> ResidualNetwork<T> for ResidualGraph<T> {
    #[inline]
    fn node_count(&self) -> usize {
        self.out.len()
    }

    #[inline]
    fn arc_count(&self) -> usize {
        self.head.len()
    }

    #[inline]
    fn degree(&self, v: usize) -> usize {
        self.out[v].len()
    }

    #[inline]
    fn arc(&self, v: usize, i: usize) -> usize {
        self.out[v][i]
    }

    #[inline]
    fn head(&self, a: usize) -> usize {
        self.head[a]
    }

    #[inline]
    fn tail(&self, a: usize) -> usize {
        self.head[a ^ 1]
    }

    #[inline]
    fn sister(&self, a: usize) -> usize {
        a ^ 1
    }

    #[inline]
    fn capacity(&self, a: usize) -> T {
        self.cap[a]
    }

    #[inline]
    fn residual(&self, a: usize) -> T {
        self.res[a]
    }

    #[inline]
    fn set_residual(&mut self, a: usize, r: T) {
        self.res[a] = r;
    }

    #[inline]
    fn terminal_caps(&self, v: usize) -> (T, T) {
        (self.source_cap[v], self.sink_cap[v])
    }

    #[inline]
    fn terminal_residual(&self, v: usize) -> (T, T) {
        (self.source_res[v], self.sink_res[v])
    }

    #[inline]
    fn set_terminal_residual(&mut self, v: usize, to_source: T, to_sink: T) {
        self.source_res[v] = to_source;
        self.sink_res[v] = to_sink;
    }

    fn set_terminal_caps(&mut self, v: usize, to_source: T, to_sink: T) -> Result<(), FlowError> {
        self.check_node(v)?;
        check_capacity(to_source)?;
        check_capacity(to_sink)?;
        self.source_cap[v] = to_source;
        self.sink_cap[v] = to_sink;
        Ok(())
    }

    fn set_arc_cap(&mut self, a: usize, cap: T) -> Result<(), FlowError> {
        self.check_arc(a)?;
        check_capacity(cap)?;
        self.cap[a] = cap;
        Ok(())
    }

    fn reset(&mut self) {
        self.res.copy_from_slice(&self.cap);
        self.source_res.copy_from_slice(&self.source_cap);
        self.sink_res.copy_from_slice(&self.sink_cap);
    }
}

impl<T: Capacity> DebugInvariants for ResidualGraph<T> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "ResidualGraph");
    }

    fn validate_invariants(&self) -> Result<(), FlowError> {
        if self.head.len() != self.cap.len() || self.cap.len() != self.res.len() {
            return Err(FlowError::InternalInconsistency(
                "arc arrays have different lengths".into(),
            ));
        }
        validate_residuals(self)
    }
}
