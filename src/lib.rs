//! # mihmds
//!
//! Memory-lean solver for the vehicle routing problem with time windows
//! (VRPTW). An initial solution is built by limited-candidate insertion,
//! then refined by in-place local search restricted to the most critical
//! routes. No distance matrix is kept; every cost query recomputes geometry
//! from coordinates, so memory stays linear in the number of customers.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Customer, Instance, Route, Solution)
//! - [`distance`] — On-demand Euclidean geometry
//! - [`evaluation`] — Route feasibility and cost evaluation
//! - [`constructive`] — Limited-candidate insertion builder
//! - [`criticality`] — Route criticality ranking
//! - [`local_search`] — Temporal shift, swap, relocate, tail exchange, 2-opt, or-opt, route merge
//! - [`solver`] — Hybrid orchestrator, configuration, statistics
//! - [`io`] — Solomon benchmark loader
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use mihmds::models::Customer;
//! use mihmds::solver::{solve, SolverConfig};
//!
//! let depot = Customer::depot(0.0, 0.0, 1000.0);
//! let customers = vec![
//!     Customer::new(1, 10.0, 0.0, 10, 5.0).with_time_window(0.0, 200.0),
//!     Customer::new(2, 10.0, 10.0, 10, 5.0).with_time_window(50.0, 300.0),
//!     Customer::new(3, 0.0, 10.0, 10, 5.0).with_time_window(0.0, 400.0),
//! ];
//!
//! let outcome = solve(depot, customers, 50, &SolverConfig::default()).unwrap();
//! assert!(outcome.solution.is_feasible());
//! assert_eq!(outcome.solution.num_served(), 3);
//! ```

pub mod constructive;
pub mod criticality;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod local_search;
pub mod models;
pub mod solver;
