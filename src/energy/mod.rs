//! Energy-side descriptors consumed by the lattice solvers.

pub mod neighbourhood;

pub use neighbourhood::Neighbourhood;
