//! Cost matrix and the oracle that evaluates tours against it.
//!
//! Building the matrix (coordinate files, geographic distances) is left to
//! the caller; this module only stores and queries it.

mod matrix;
mod oracle;

pub use matrix::CostMatrix;
pub use oracle::{CostOracle, DEPOT};
