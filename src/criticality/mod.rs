//! Route criticality ranking.
//!
//! Selects the handful of routes most worth improving so that the
//! local-search phase does bounded work regardless of fleet size.

mod scorer;

pub use scorer::{CriticalityScorer, CriticalityWeights, RouteProfile};
