//! Voxel masking for lattice graphs.
//!
//! Whether a grid can carry a mask is decided by a type parameter so the
//! unmasked form never stores or checks one.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::flow::Origin;

/// Per-node mask state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mask {
    /// Takes part in the optimization.
    #[default]
    Free,
    /// Fixed to the source side.
    Source,
    /// Fixed to the sink side.
    Sink,
}

impl Mask {
    /// Label a fixed node always gets.
    pub fn fixed_origin(self) -> Option<Origin> {
        match self {
            Mask::Free => None,
            Mask::Source => Some(Origin::Source),
            Mask::Sink => Some(Origin::Sink),
        }
    }
}

impl From<Origin> for Mask {
    fn from(o: Origin) -> Self {
        match o {
            Origin::Source => Mask::Source,
            Origin::Sink => Mask::Sink,
        }
    }
}

/// Compile-time switch between masked and unmasked lattices.
pub trait MaskMode: Clone + Copy + Debug + Default + Send + Sync + 'static {
    const ENABLED: bool;
}

/// Every lattice node takes part in the optimization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unmasked;

/// Nodes can be fixed to a terminal with [`GridGraph::set_mask`](super::GridGraph::set_mask).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Masked;

impl MaskMode for Unmasked {
    const ENABLED: bool = false;
}

impl MaskMode for Masked {
    const ENABLED: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_origins() {
        assert_eq!(Mask::Free.fixed_origin(), None);
        assert_eq!(Mask::from(Origin::Sink).fixed_origin(), Some(Origin::Sink));
        assert_eq!(Mask::default(), Mask::Free);
        assert!(Masked::ENABLED && !Unmasked::ENABLED);
    }
}
