//! Domain model types for the vehicle routing problem with time windows.
//!
//! Provides the core abstractions: customers with demands and time windows,
//! the problem instance that owns the customer catalog, routes as ordered
//! sequences of customer ids, and the solution that holds them.

mod customer;
mod instance;
mod route;
mod solution;

pub use customer::{Customer, Site, TimeWindow};
pub use instance::Instance;
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
