//! Numeric bound shared by every network and solver.

use std::fmt::Debug;

use num_traits::{NumCast, Signed};

use crate::flow_error::FlowError;

/// Scalar type usable as an arc or terminal capacity.
///
/// Signed types are required because the tree solvers keep the net terminal
/// residual of a node and the incremental path reparameterizes capacities
/// through negative intermediate values. Integer types give exact results;
/// `f32`/`f64` are supported with the usual rounding caveats.
pub trait Capacity: Copy + Debug + PartialOrd + Signed + NumCast + Send + Sync + 'static {}

impl<T> Capacity for T where T: Copy + Debug + PartialOrd + Signed + NumCast + Send + Sync + 'static {}

#[inline]
pub(crate) fn min_cap<T: Capacity>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

#[inline]
pub(crate) fn max_cap<T: Capacity>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

/// Reject negative and NaN capacities.
pub fn check_capacity<T: Capacity>(cap: T) -> Result<(), FlowError> {
    // NaN fails the comparison as well
    if cap >= T::zero() {
        Ok(())
    } else {
        Err(FlowError::NegativeCapacity(format!("{cap:?}")))
    }
}
