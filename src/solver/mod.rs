//! Hybrid solver: construction, criticality ranking, and local search
//! rounds under iteration and time budgets.
//!
//! - [`HybridSolver`] — the orchestrator state machine
//! - [`SolverConfig`] — every tunable, with validation
//! - [`SolveStats`] — rounds, accepted moves, costs, timings
//! - [`solve`] — one-call entry point over raw records

mod config;
mod hybrid;
mod stats;

pub use config::SolverConfig;
pub use hybrid::{solve, HybridSolver, SolveOutcome};
pub use stats::{MoveCounts, SolveStats, Termination};
