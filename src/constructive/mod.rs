//! Constructive heuristics for building initial VRPTW solutions.
//!
//! - [`InsertionBuilder`] — limited-candidate insertion with seeded slot
//!   sampling, O(n · k · L)

mod insertion;

pub use insertion::{InsertionBuilder, InsertionOrder};
