//! N-dimensional lattice graph with implicit arcs.
//!
//! The lattice is stored with a border of padding nodes, as wide along each
//! axis as the neighbourhood reaches, so that every neighbour of an interior
//! node is a valid index and no bounds checks are needed while solving.
//! Padding nodes are excluded and never carry residual capacity.
//!
//! Internal node ids index the padded array with the first axis varying
//! fastest. The arc from node `v` along neighbourhood offset `k` has id
//! `v * K + k`; its sister is the arc from the neighbour back along the
//! mirrored offset.

use std::marker::PhantomData;

use crate::capacity::{Capacity, check_capacity};
use crate::debug_invariants::DebugInvariants;
use crate::energy::Neighbourhood;
use crate::flow::general::ResidualGraph;
use crate::flow::grid::mask::{Mask, MaskMode, Masked, Unmasked};
use crate::flow::network::ResidualNetwork;
use crate::flow::{Origin, validate_residuals};
use crate::flow_error::FlowError;

#[derive(Debug, Clone)]
pub struct GridGraph<T, const N: usize, M = Unmasked> {
    dims: [usize; N],
    padded: [usize; N],
    stride: [usize; N],
    border: [usize; N],
    neighbourhood: Neighbourhood<N>,
    /// Linear index shift per offset.
    shift: Vec<isize>,
    opposite: Vec<usize>,
    excluded: Vec<bool>,
    /// One entry per node for masked grids, empty otherwise.
    mask: Vec<Mask>,
    cap: Vec<T>,
    res: Vec<T>,
    source_cap: Vec<T>,
    sink_cap: Vec<T>,
    source_res: Vec<T>,
    sink_res: Vec<T>,
    _mode: PhantomData<M>,
}

impl<T: Capacity, const N: usize, M: MaskMode> GridGraph<T, N, M> {
    /// Lattice of extent `dims` with zero capacities everywhere.
    ///
    /// The neighbourhood must be symmetric.
    pub fn new(dims: [usize; N], neighbourhood: &Neighbourhood<N>) -> Result<Self, FlowError> {
        if N == 0 || dims.contains(&0) {
            return Err(FlowError::EmptyGrid(dims.to_vec()));
        }
        neighbourhood.require_symmetric()?;
        let border = neighbourhood.extent();
        let mut padded = [0usize; N];
        let mut stride = [0usize; N];
        let mut total = 1usize;
        for i in 0..N {
            padded[i] = dims[i] + 2 * border[i];
            stride[i] = total;
            total *= padded[i];
        }
        let shift = neighbourhood
            .iter()
            .map(|o| o.iter().zip(&stride).map(|(&c, &s)| c * s as isize).sum::<isize>())
            .collect();
        let opposite = (0..neighbourhood.len())
            .map(|k| {
                neighbourhood
                    .opposite(k)
                    .ok_or_else(|| FlowError::AsymmetricNeighbourhood(neighbourhood[k].to_vec()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let k = neighbourhood.len();
        let mut grid = Self {
            dims,
            padded,
            stride,
            border,
            neighbourhood: neighbourhood.clone(),
            shift,
            opposite,
            excluded: vec![true; total],
            mask: if M::ENABLED { vec![Mask::Free; total] } else { Vec::new() },
            cap: vec![T::zero(); total * k],
            res: vec![T::zero(); total * k],
            source_cap: vec![T::zero(); total],
            sink_cap: vec![T::zero(); total],
            source_res: vec![T::zero(); total],
            sink_res: vec![T::zero(); total],
            _mode: PhantomData,
        };
        for v in grid.nodes().collect::<Vec<_>>() {
            grid.excluded[v] = false;
        }
        log::trace!("grid {dims:?} padded to {padded:?}, {k} offsets");
        Ok(grid)
    }

    #[inline]
    pub fn dims(&self) -> [usize; N] {
        self.dims
    }

    pub fn neighbourhood(&self) -> &Neighbourhood<N> {
        &self.neighbourhood
    }

    /// Number of lattice sites (padding excluded).
    pub fn site_count(&self) -> usize {
        self.dims.iter().product()
    }

    /// Internal id of the site at `coord`.
    pub fn node(&self, coord: [usize; N]) -> Result<usize, FlowError> {
        if coord.iter().zip(&self.dims).any(|(c, d)| c >= d) {
            return Err(FlowError::CoordinateOutOfRange {
                coord: coord.to_vec(),
                dims: self.dims.to_vec(),
            });
        }
        Ok(coord
            .iter()
            .zip(&self.border)
            .zip(&self.stride)
            .map(|((c, b), s)| (c + b) * s)
            .sum())
    }

    /// Coordinate of node `v`, or `None` for padding.
    pub fn coord(&self, v: usize) -> Option<[usize; N]> {
        if v >= self.excluded.len() {
            return None;
        }
        let mut coord = [0usize; N];
        let mut rest = v;
        for i in 0..N {
            let p = rest % self.padded[i];
            rest /= self.padded[i];
            if p < self.border[i] || p >= self.border[i] + self.dims[i] {
                return None;
            }
            coord[i] = p - self.border[i];
        }
        Some(coord)
    }

    /// Internal ids of every site in row-major order, first axis fastest.
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.site_count()).map(move |mut u| {
            let mut v = 0;
            for i in 0..N {
                v += (u % self.dims[i] + self.border[i]) * self.stride[i];
                u /= self.dims[i];
            }
            v
        })
    }

    /// Id of the arc leaving `v` along offset `k`.
    #[inline]
    pub fn arc_id(&self, v: usize, k: usize) -> usize {
        v * self.neighbourhood.len() + k
    }

    /// Give every arc along offset `k` the capacity `weights[k]`.
    pub fn set_neighbourhood_weights(&mut self, weights: &[T]) -> Result<(), FlowError> {
        let k = self.neighbourhood.len();
        if weights.len() != k {
            return Err(FlowError::DimensionMismatch {
                expected: k,
                found: weights.len(),
            });
        }
        for &w in weights {
            check_capacity(w)?;
        }
        for row in self.cap.chunks_exact_mut(k) {
            row.copy_from_slice(weights);
        }
        Ok(())
    }

    /// Terminal capacities of the site at `coord`.
    pub fn set_terminal(&mut self, coord: [usize; N], to_source: T, to_sink: T) -> Result<(), FlowError> {
        let v = self.node(coord)?;
        self.set_terminal_caps(v, to_source, to_sink)
    }

    /// Terminal capacities of every site, in [`nodes`](Self::nodes) order.
    pub fn set_terminal_images(&mut self, to_source: &[T], to_sink: &[T]) -> Result<(), FlowError> {
        let sites = self.site_count();
        for len in [to_source.len(), to_sink.len()] {
            if len != sites {
                return Err(FlowError::DimensionMismatch {
                    expected: sites,
                    found: len,
                });
            }
        }
        for (&s, &t) in to_source.iter().zip(to_sink) {
            check_capacity(s)?;
            check_capacity(t)?;
        }
        let nodes: Vec<usize> = self.nodes().collect();
        for (i, v) in nodes.into_iter().enumerate() {
            self.source_cap[v] = to_source[i];
            self.sink_cap[v] = to_sink[i];
        }
        Ok(())
    }

    /// Sites taking part in the optimization.
    pub fn free_node_count(&self) -> usize {
        self.excluded.iter().filter(|&&e| !e).count()
    }

    /// Equivalent generic graph over the free sites.
    ///
    /// Also returns, for every generic node, the grid node it stands for.
    pub fn to_residual_graph(&self) -> Result<(ResidualGraph<T>, Vec<usize>), FlowError> {
        let order: Vec<usize> = self.nodes().filter(|&v| !self.excluded[v]).collect();
        let mut index = vec![usize::MAX; self.excluded.len()];
        for (i, &v) in order.iter().enumerate() {
            index[v] = i;
        }
        let k = self.neighbourhood.len();
        let mut g = ResidualGraph::with_capacity(order.len(), order.len() * k / 2);
        for (i, &v) in order.iter().enumerate() {
            let (s, t) = self.terminal_caps(v);
            g.set_terminal_caps(i, s, t)?;
        }
        for &v in &order {
            for o in (0..k).filter(|&o| self.neighbourhood.is_forward(o)) {
                let a = self.arc_id(v, o);
                let j = self.head(a);
                if self.excluded[j] {
                    continue;
                }
                g.add_arc_pair(index[v], index[j], self.cap[a], self.cap[self.sister(a)])?;
            }
        }
        Ok((g, order))
    }
}

impl<T: Capacity, const N: usize> GridGraph<T, N, Masked> {
    /// Fix node `v` to a terminal, or free it again.
    pub fn set_mask(&mut self, v: usize, mask: Mask) -> Result<(), FlowError> {
        self.check_node(v)?;
        self.mask[v] = mask;
        self.excluded[v] = mask != Mask::Free;
        Ok(())
    }

    /// Mask of every site, in [`nodes`](Self::nodes) order.
    pub fn set_masks(&mut self, masks: &[Mask]) -> Result<(), FlowError> {
        let sites = self.site_count();
        if masks.len() != sites {
            return Err(FlowError::MaskSizeMismatch {
                expected: sites,
                found: masks.len(),
            });
        }
        let nodes: Vec<usize> = self.nodes().collect();
        for (v, &m) in nodes.into_iter().zip(masks) {
            self.mask[v] = m;
            self.excluded[v] = m != Mask::Free;
        }
        Ok(())
    }

    pub fn mask(&self, v: usize) -> Mask {
        self.mask.get(v).copied().unwrap_or_default()
    }
}

impl<T: Capacity, const N: usize, M: MaskMode> ResidualNetwork<T> for GridGraph<T, N, M> {
    #[inline]
    fn node_count(&self) -> usize {
        self.excluded.len()
    }

    #[inline]
    fn arc_count(&self) -> usize {
        self.cap.len()
    }

    #[inline]
    fn is_excluded(&self, v: usize) -> bool {
        self.excluded[v]
    }

    #[inline]
    fn fixed_origin(&self, v: usize) -> Option<Origin> {
        if M::ENABLED {
            self.mask[v].fixed_origin()
        } else {
            None
        }
    }

    /// Padding and masked nodes have no arcs.
    #[inline]
    fn degree(&self, v: usize) -> usize {
        if self.excluded[v] { 0 } else { self.neighbourhood.len() }
    }

    #[inline]
    fn arc(&self, v: usize, i: usize) -> usize {
        self.arc_id(v, i)
    }

    #[inline]
    fn head(&self, a: usize) -> usize {
        let k = self.neighbourhood.len();
        (self.tail(a) as isize + self.shift[a % k]) as usize
    }

    #[inline]
    fn tail(&self, a: usize) -> usize {
        a / self.neighbourhood.len()
    }

    #[inline]
    fn sister(&self, a: usize) -> usize {
        let k = self.neighbourhood.len();
        self.head(a) * k + self.opposite[a % k]
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

    /// Arcs to fixed neighbours are folded in: an arc from a source-fixed
    /// neighbour adds to the source capacity, an arc to a sink-fixed neighbour
    /// adds to the sink capacity.
    fn terminal_caps(&self, v: usize) -> (T, T) {
        let (mut s, mut t) = (self.source_cap[v], self.sink_cap[v]);
        if M::ENABLED && !self.excluded[v] {
            for k in 0..self.neighbourhood.len() {
                let a = self.arc_id(v, k);
                match self.mask[self.head(a)] {
                    Mask::Free => {}
                    Mask::Source => s = s + self.cap[self.sister(a)],
                    Mask::Sink => t = t + self.cap[a],
                }
            }
        }
        (s, t)
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

    /// Padding nodes are not addressable.
    fn check_node(&self, v: usize) -> Result<(), FlowError> {
        match self.coord(v) {
            Some(_) => Ok(()),
            None => Err(FlowError::NodeOutOfRange {
                node: v,
                count: self.node_count(),
            }),
        }
    }

    /// Arcs leaving padding are not addressable.
    fn check_arc(&self, a: usize) -> Result<(), FlowError> {
        if a < self.arc_count() && self.coord(self.tail(a)).is_some() {
            Ok(())
        } else {
            Err(FlowError::ArcOutOfRange {
                arc: a,
                count: self.arc_count(),
            })
        }
    }

    fn reset(&mut self) {
        let k = self.neighbourhood.len();
        for v in 0..self.node_count() {
            if self.excluded[v] {
                self.source_res[v] = T::zero();
                self.sink_res[v] = T::zero();
                self.res[v * k..(v + 1) * k].fill(T::zero());
                continue;
            }
            let (s, t) = self.terminal_caps(v);
            self.source_res[v] = s;
            self.sink_res[v] = t;
            for o in 0..k {
                let a = v * k + o;
                let j = (v as isize + self.shift[o]) as usize;
                self.res[a] = if self.excluded[j] { T::zero() } else { self.cap[a] };
            }
        }
    }
}

impl<T: Capacity, const N: usize, M: MaskMode> DebugInvariants for GridGraph<T, N, M> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "GridGraph");
    }

    fn validate_invariants(&self) -> Result<(), FlowError> {
        let n = self.excluded.len();
        let k = self.neighbourhood.len();
        if self.cap.len() != n * k || self.res.len() != n * k {
            return Err(FlowError::InternalInconsistency(
                "arc arrays do not match the lattice".into(),
            ));
        }
        for v in (0..n).filter(|&v| !self.excluded[v]) {
            for o in 0..k {
                let a = v * k + o;
                if self.excluded[self.head(a)] && self.res[a] != T::zero() {
                    return Err(FlowError::InternalInconsistency(format!(
                        "arc {a} into an excluded node carries residual {:?}",
                        self.res[a]
                    )));
                }
            }
        }
        validate_residuals(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n4() -> Neighbourhood<2> {
        Neighbourhood::common(4, true).unwrap()
    }

    #[test]
    fn coordinates_round_trip_through_padding() {
        let g = GridGraph::<i32, 2>::new([3, 2], &n4()).unwrap();
        assert_eq!(g.node_count(), 5 * 4);
        assert_eq!(g.free_node_count(), 6);
        let nodes: Vec<_> = g.nodes().collect();
        assert_eq!(nodes.len(), 6);
        assert_eq!(g.coord(nodes[1]), Some([1, 0]));
        assert_eq!(g.coord(nodes[3]), Some([0, 1]));
        assert_eq!(g.node([2, 1]).unwrap(), nodes[5]);
        assert_eq!(g.coord(0), None);
        assert!(matches!(
            g.node([3, 0]),
            Err(FlowError::CoordinateOutOfRange { .. })
        ));
    }

    #[test]
    fn arcs_and_sisters() {
        let g = GridGraph::<i32, 2>::new([3, 3], &n4()).unwrap();
        let v = g.node([1, 1]).unwrap();
        for i in 0..g.degree(v) {
            let a = g.arc(v, i);
            assert_eq!(g.tail(a), v);
            let j = g.head(a);
            assert!(!g.is_excluded(j));
            assert_eq!(g.sister(g.sister(a)), a);
            assert_eq!(g.head(g.sister(a)), v);
        }
        let corner = g.node([0, 0]).unwrap();
        let outside = (0..4).filter(|&i| g.is_excluded(g.head(g.arc(corner, i)))).count();
        assert_eq!(outside, 2);
    }

    #[test]
    fn rejects_bad_construction() {
        assert_eq!(
            GridGraph::<i32, 2>::new([0, 3], &n4()).unwrap_err(),
            FlowError::EmptyGrid(vec![0, 3])
        );
        let half = Neighbourhood::<2>::common(4, false).unwrap();
        assert!(matches!(
            GridGraph::<i32, 2>::new([2, 2], &half),
            Err(FlowError::AsymmetricNeighbourhood(_))
        ));
        let mut g = GridGraph::<i32, 2>::new([2, 2], &n4()).unwrap();
        assert_eq!(
            g.set_neighbourhood_weights(&[1, 1]),
            Err(FlowError::DimensionMismatch { expected: 4, found: 2 })
        );
        assert!(g.set_terminal_images(&[1; 4], &[0; 3]).is_err());
    }

    #[test]
    fn reset_keeps_padding_dry() {
        let mut g = GridGraph::<i32, 2>::new([2, 2], &n4()).unwrap();
        g.set_neighbourhood_weights(&[1, 1, 1, 1]).unwrap();
        g.set_terminal([0, 0], 5, 0).unwrap();
        g.reset();
        assert!(g.validate_invariants().is_ok());
        let v = g.node([0, 0]).unwrap();
        let live = (0..4)
            .map(|i| g.arc(v, i))
            .filter(|&a| g.residual(a) > 0)
            .count();
        assert_eq!(live, 2);
        assert_eq!(g.terminal_residual(v), (5, 0));
    }

    #[test]
    fn padding_ids_are_rejected() {
        let mut g = GridGraph::<i32, 2>::new([2, 2], &n4()).unwrap();
        assert!(matches!(
            g.set_terminal_caps(0, 5, 5),
            Err(FlowError::NodeOutOfRange { node: 0, .. })
        ));
        assert!(matches!(g.set_arc_cap(0, 1), Err(FlowError::ArcOutOfRange { arc: 0, .. })));
        let v = g.node([1, 1]).unwrap();
        // an arc from a site into the padding is still addressable
        let outward = (0..4).map(|i| g.arc(v, i)).find(|&a| g.is_excluded(g.head(a))).unwrap();
        assert!(g.set_arc_cap(outward, 1).is_ok());
        assert!(g.set_terminal_caps(v, 5, 5).is_ok());
        assert!(g.set_terminal_caps(g.node_count(), 1, 1).is_err());
    }

    #[test]
    fn masks_fold_into_terminals() {
        let mut g = GridGraph::<i64, 2, Masked>::new([3, 1], &n4()).unwrap();
        g.set_neighbourhood_weights(&[2, 2, 2, 2]).unwrap();
        let [a, b, c] = [[0, 0], [1, 0], [2, 0]].map(|p| g.node(p).unwrap());
        g.set_mask(a, Mask::Source).unwrap();
        g.set_mask(c, Mask::Sink).unwrap();
        g.set_terminal_caps(b, 1, 1).unwrap();
        assert_eq!(g.terminal_caps(b), (3, 3));
        assert_eq!(g.free_node_count(), 1);
        assert_eq!(g.fixed_origin(a), Some(Origin::Source));
        assert_eq!(g.fixed_origin(b), None);
        assert!(g.set_mask(0, Mask::Sink).is_err());
        assert_eq!(
            g.set_masks(&[Mask::Free]),
            Err(FlowError::MaskSizeMismatch { expected: 3, found: 1 })
        );

        let (generic, order) = g.to_residual_graph().unwrap();
        assert_eq!(order, vec![b]);
        assert_eq!(generic.terminal_caps(0), (3, 3));
        assert_eq!(generic.arc_count(), 0);
    }

    #[test]
    fn generic_conversion_keeps_every_edge_once() {
        let mut g = GridGraph::<i32, 2>::new([2, 2], &n4()).unwrap();
        g.set_neighbourhood_weights(&[1, 2, 3, 4]).unwrap();
        let (generic, order) = g.to_residual_graph().unwrap();
        assert_eq!(order.len(), 4);
        // 4 undirected lattice edges
        assert_eq!(generic.arc_pair_count(), 4);
        for a in 0..generic.arc_count() {
            let (u, v) = (order[generic.tail(a)], order[generic.head(a)]);
            let grid_arc = (0..4).map(|i| g.arc(u, i)).find(|&x| g.head(x) == v).unwrap();
            assert_eq!(generic.capacity(a), g.capacity(grid_arc));
        }
    }
}
