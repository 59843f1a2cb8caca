//! On-demand Euclidean geometry.
//!
//! No distance matrix is ever materialized: every query recomputes the
//! distance from coordinates, keeping memory at O(n) in the number of
//! customers.

mod euclidean;

pub use euclidean::euclidean;
