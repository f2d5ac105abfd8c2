//! Lattice neighbourhoods: relative offsets defining pairwise adjacency on a grid.
//!
//! A neighbourhood is an ordered list of non-zero offset vectors. Grid graphs
//! need it *symmetric* (every offset accompanied by its negation) because each
//! lattice arc is stored together with its reverse arc. The half form, one
//! offset per mirrored pair, is convenient for enumerating undirected edges once.
//!
//! Named patterns follow the usual `N<k>` convention: `N4`/`N8`/`N16`/`N32` in
//! 2D and `N6`/`N18`/`N26` in 3D.

use std::ops::Index;
use std::str::FromStr;

use itertools::Itertools;

use crate::flow_error::FlowError;

/// Ordered set of relative lattice offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighbourhood<const N: usize> {
    offsets: Vec<[isize; N]>,
}

impl<const N: usize> Neighbourhood<N> {
    /// One of the canonical lattice patterns with `k` neighbours.
    ///
    /// Supported in any dimension: `k = 2N` (axis neighbours) and
    /// `k = 3^N - 1` (unit box). In 2D also 16 and 32, in 3D also 18.
    /// With `symmetric = false` only one offset of each mirrored pair is kept.
    pub fn common(k: usize, symmetric: bool) -> Result<Self, FlowError> {
        let full_box = 3usize.pow(N as u32) - 1;
        let nb = if k == 2 * N {
            Self::boxed(1, false, true)?
        } else if k == full_box {
            Self::boxed(1, true, true)?
        } else {
            match (N, k) {
                (2, 16) => Self::boxed(2, true, true)?,
                (2, 32) => Self::boxed(3, true, true)?,
                (3, 18) => Self::boxed(2, false, true)?,
                _ => return Err(FlowError::UnknownNeighbourhood(format!("N{k} in {N}D"))),
            }
        };
        debug_assert_eq!(nb.len(), k);
        Ok(if symmetric { nb } else { nb.half() })
    }

    /// All primitive offsets within `radius`.
    ///
    /// Without diagonals the L1 ball is used, with diagonals the L∞ box.
    /// Only primitive vectors (component gcd of 1) are kept so no direction
    /// appears twice.
    pub fn boxed(radius: usize, diagonals: bool, symmetric: bool) -> Result<Self, FlowError> {
        if radius == 0 || N == 0 {
            return Err(FlowError::UnknownNeighbourhood(format!(
                "box of radius {radius} in {N}D"
            )));
        }
        let r = radius as isize;
        let offsets: Vec<[isize; N]> = (0..N)
            .map(|_| -r..=r)
            .multi_cartesian_product()
            .filter_map(|v| {
                let mut ofs = [0isize; N];
                ofs.copy_from_slice(&v);
                let within = if diagonals {
                    true
                } else {
                    ofs.iter().map(|c| c.unsigned_abs()).sum::<usize>() <= radius
                };
                (within && is_primitive(&ofs)).then_some(ofs)
            })
            .collect();
        let nb = Self { offsets };
        Ok(if symmetric { nb } else { nb.half() })
    }

    /// Parse a textual `N<k>` identifier, e.g. `"N8"`.
    pub fn parse(name: &str, symmetric: bool) -> Result<Self, FlowError> {
        let k = name
            .strip_prefix(['N', 'n'])
            .and_then(|rest| rest.parse::<usize>().ok())
            .ok_or_else(|| FlowError::UnknownNeighbourhood(name.to_string()))?;
        Self::common(k, symmetric)
    }

    /// Neighbourhood from explicit offsets; zero and duplicate offsets are rejected.
    pub fn from_offsets(offsets: Vec<[isize; N]>) -> Result<Self, FlowError> {
        for (i, o) in offsets.iter().enumerate() {
            if o.iter().all(|&c| c == 0) || offsets[..i].contains(o) {
                return Err(FlowError::UnknownNeighbourhood(format!("offset {o:?}")));
            }
        }
        Ok(Self { offsets })
    }

    /// Number of offsets.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    #[inline]
    pub fn offsets(&self) -> &[[isize; N]] {
        &self.offsets
    }

    pub fn iter(&self) -> impl Iterator<Item = &[isize; N]> {
        self.offsets.iter()
    }

    /// Index of the negated offset of `k`, if present.
    pub fn opposite(&self, k: usize) -> Option<usize> {
        let neg = self.offsets[k].map(|c| -c);
        self.offsets.iter().position(|o| *o == neg)
    }

    /// `true` if every offset comes with its mirror.
    pub fn is_symmetric(&self) -> bool {
        (0..self.len()).all(|k| self.opposite(k).is_some())
    }

    /// Error naming the first offset without a mirror.
    pub fn require_symmetric(&self) -> Result<(), FlowError> {
        match (0..self.len()).find(|&k| self.opposite(k).is_none()) {
            Some(k) => Err(FlowError::AsymmetricNeighbourhood(self.offsets[k].to_vec())),
            None => Ok(()),
        }
    }

    /// Largest absolute offset component along every axis.
    pub fn extent(&self) -> [usize; N] {
        let mut ext = [0usize; N];
        for o in &self.offsets {
            for (e, c) in ext.iter_mut().zip(o) {
                *e = (*e).max(c.unsigned_abs());
            }
        }
        ext
    }

    /// Largest absolute offset component over all axes.
    pub fn radius(&self) -> usize {
        self.extent().into_iter().max().unwrap_or(0)
    }

    /// `true` if the first non-zero component of offset `k` is positive.
    pub fn is_forward(&self, k: usize) -> bool {
        is_positive(&self.offsets[k])
    }

    /// Keep offsets whose first non-zero component is positive.
    pub fn half(&self) -> Self {
        let offsets = self
            .offsets
            .iter()
            .copied()
            .filter(is_positive)
            .collect();
        Self { offsets }
    }

    /// Add the missing mirror of every offset.
    pub fn symmetric_closure(&self) -> Self {
        let mut offsets = self.offsets.clone();
        for o in &self.offsets {
            let neg = o.map(|c| -c);
            if !offsets.contains(&neg) {
                offsets.push(neg);
            }
        }
        Self { offsets }
    }
}

impl<const N: usize> Index<usize> for Neighbourhood<N> {
    type Output = [isize; N];

    fn index(&self, k: usize) -> &[isize; N] {
        &self.offsets[k]
    }
}

impl<const N: usize> FromStr for Neighbourhood<N> {
    type Err = FlowError;

    /// Symmetric neighbourhood from an `N<k>` identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, true)
    }
}

fn is_positive<const N: usize>(o: &[isize; N]) -> bool {
    o.iter().find(|&&c| c != 0).is_some_and(|&c| c > 0)
}

fn is_primitive<const N: usize>(o: &[isize; N]) -> bool {
    o.iter().fold(0usize, |g, c| gcd(g, c.unsigned_abs())) == 1
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_sizes() {
        for k in [4, 8, 16, 32] {
            assert_eq!(Neighbourhood::<2>::common(k, true).unwrap().len(), k);
            assert_eq!(Neighbourhood::<2>::common(k, false).unwrap().len(), k / 2);
        }
        for k in [6, 18, 26] {
            assert_eq!(Neighbourhood::<3>::common(k, true).unwrap().len(), k);
        }
        assert!(Neighbourhood::<2>::common(6, true).is_err());
        assert!(Neighbourhood::<3>::common(8, true).is_err());
    }

    #[test]
    fn n4_is_axis_aligned_and_mirrored() {
        let nb = Neighbourhood::<2>::common(4, true).unwrap();
        for o in nb.iter() {
            assert_eq!(o.iter().map(|c| c.abs()).sum::<isize>(), 1);
        }
        assert!(nb.is_symmetric());
        for k in 0..nb.len() {
            let j = nb.opposite(k).unwrap();
            assert_eq!(nb[j], nb[k].map(|c| -c));
        }
        assert_eq!(nb.extent(), [1, 1]);
    }

    #[test]
    fn half_and_closure() {
        let nb = Neighbourhood::<3>::common(26, false).unwrap();
        assert!(!nb.is_symmetric());
        assert!(nb.require_symmetric().is_err());
        let full = nb.symmetric_closure();
        assert_eq!(full.len(), 26);
        assert!(full.require_symmetric().is_ok());
    }

    #[test]
    fn parse_identifiers() {
        let nb: Neighbourhood<2> = "N8".parse().unwrap();
        assert_eq!(nb.len(), 8);
        assert_eq!(Neighbourhood::<2>::parse("n16", false).unwrap().len(), 8);
        assert_eq!(
            Neighbourhood::<2>::parse("X8", true),
            Err(FlowError::UnknownNeighbourhood("X8".into()))
        );
        assert!(Neighbourhood::<2>::parse("N", true).is_err());
    }

    #[test]
    fn explicit_offsets_are_validated() {
        assert!(Neighbourhood::<2>::from_offsets(vec![[1, 0], [-1, 0]]).is_ok());
        assert!(Neighbourhood::<2>::from_offsets(vec![[0, 0]]).is_err());
        assert!(Neighbourhood::<2>::from_offsets(vec![[1, 0], [1, 0]]).is_err());
    }

    #[test]
    fn box_of_radius_two_has_knight_moves() {
        let nb = Neighbourhood::<2>::boxed(2, true, true).unwrap();
        assert!(nb.offsets().contains(&[1, 2]));
        assert!(nb.offsets().contains(&[-2, 1]));
        assert!(!nb.offsets().contains(&[2, 2]));
        assert_eq!(nb.extent(), [2, 2]);
    }
}
