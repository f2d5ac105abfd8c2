//! Generic (explicit arc list) graphs.

pub mod graph;

pub use graph::{ArcId, ResidualGraph};
