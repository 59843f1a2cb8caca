//! Solution and violation types.

use serde::{Deserialize, Serialize};

use crate::evaluation::{RouteEvaluator, EPSILON};

use super::{Instance, Route};

/// A broken invariant found by [`Solution::verify`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// A catalog customer is not served by any route.
    MissingCustomer {
        /// Customer ID.
        customer_id: usize,
    },
    /// A customer is served more than once.
    DuplicateCustomer {
        /// Customer ID.
        customer_id: usize,
    },
    /// A route visits an id that is not in the catalog.
    UnknownCustomer {
        /// Route index in the solution.
        route_index: usize,
        /// Unknown id.
        customer_id: usize,
    },
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Load that exceeded capacity.
        load: u64,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// Service cannot start within the customer's window.
    TimeWindowViolated {
        /// Route index in the solution.
        route_index: usize,
        /// Position of the first stop that misses its window.
        position: usize,
    },
    /// The cached route cost differs from an independent re-evaluation.
    CostMismatch {
        /// Route index in the solution.
        route_index: usize,
        /// Cost stored on the route.
        cached: f64,
        /// Cost recomputed by the evaluator.
        recomputed: f64,
    },
    /// A route with no stops is still present.
    EmptyRoute {
        /// Route index in the solution.
        route_index: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// The routes of a VRPTW solution.
///
/// Routes live in an arena addressed by index; operators receive indices,
/// never references into route contents. During an improvement round an
/// emptied route stays as a tombstone so that in-flight indices remain
/// valid; [`Solution::compact`] drops tombstones at round boundaries.
///
/// Total cost, vehicle count, and feasibility are always derived from the
/// routes on demand.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance, Solution};
///
/// let instance = Instance::new(Customer::depot(0.0, 0.0, 100.0), vec![], 10).unwrap();
/// let solution = Solution::new(instance.capacity());
/// assert_eq!(solution.num_vehicles(), 0);
/// assert_eq!(solution.total_cost(), 0.0);
/// assert!(solution.verify(&instance).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SolutionRepr", into = "SolutionRepr")]
pub struct Solution {
    routes: Vec<Route>,
    capacity: u32,
}

impl Solution {
    /// Creates an empty solution for vehicles of the given capacity.
    pub fn new(capacity: u32) -> Self {
        Self {
            routes: Vec::new(),
            capacity,
        }
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Routes in order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route at `index`.
    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    /// Number of route slots, tombstones included.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of vehicles dispatched (non-empty routes).
    pub fn num_vehicles(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Sum of route costs.
    pub fn total_cost(&self) -> f64 {
        self.routes.iter().map(Route::cost).sum()
    }

    /// Returns `true` if every route is feasible.
    pub fn is_feasible(&self) -> bool {
        self.routes.iter().all(Route::is_feasible)
    }

    /// Total number of stops across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    pub(crate) fn push_route(&mut self, route: Route) -> usize {
        self.routes.push(route);
        self.routes.len() - 1
    }

    pub(crate) fn route_mut(&mut self, index: usize) -> &mut Route {
        &mut self.routes[index]
    }

    /// Mutable access to two distinct routes.
    pub(crate) fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Route, &mut Route) {
        assert_ne!(a, b, "pair_mut requires distinct routes");
        if a < b {
            let (left, right) = self.routes.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.routes.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Drops emptied routes, preserving the order of the rest.
    ///
    /// Returns the number of routes removed.
    pub fn compact(&mut self) -> usize {
        let before = self.routes.len();
        self.routes.retain(|r| !r.is_empty());
        before - self.routes.len()
    }

    /// Checks every solution invariant against `instance`.
    ///
    /// Returns an empty list when every customer is served exactly once,
    /// all routes respect capacity and time windows, no empty route remains,
    /// and every cached route cost matches an independent re-evaluation.
    pub fn verify(&self, instance: &Instance) -> Vec<Violation> {
        let evaluator = RouteEvaluator::new(instance);
        let mut violations = Vec::new();
        let mut seen = vec![0u32; instance.num_customers()];

        for (route_index, route) in self.routes.iter().enumerate() {
            if route.is_empty() {
                violations.push(Violation::new(ViolationType::EmptyRoute { route_index }));
                continue;
            }

            let mut load: u64 = 0;
            let mut known = true;
            for &id in route.customer_ids() {
                match instance.position(id) {
                    Some(pos) => {
                        seen[pos] += 1;
                        load += u64::from(instance.customers()[pos].demand());
                    }
                    None => {
                        known = false;
                        violations.push(Violation::new(ViolationType::UnknownCustomer {
                            route_index,
                            customer_id: id,
                        }));
                    }
                }
            }
            if load > u64::from(self.capacity) {
                violations.push(Violation::new(ViolationType::CapacityExceeded {
                    route_index,
                    load,
                    capacity: self.capacity,
                }));
            }

            let mut last_ok = None;
            let eval = evaluator.inspect(
                route.customer_ids().iter().copied(),
                route.departure_time(),
                |stop| last_ok = Some(stop.position),
            );
            if !eval.feasible {
                if known && load <= u64::from(self.capacity) {
                    violations.push(Violation::new(ViolationType::TimeWindowViolated {
                        route_index,
                        position: last_ok.map_or(0, |p| p + 1),
                    }));
                }
            } else if (eval.cost - route.cost()).abs() > EPSILON {
                violations.push(Violation::new(ViolationType::CostMismatch {
                    route_index,
                    cached: route.cost(),
                    recomputed: eval.cost,
                }));
            }
        }

        for (pos, &count) in seen.iter().enumerate() {
            let customer_id = instance.customers()[pos].id();
            if count == 0 {
                violations.push(Violation::new(ViolationType::MissingCustomer { customer_id }));
            } else if count > 1 {
                violations.push(Violation::new(ViolationType::DuplicateCustomer { customer_id }));
            }
        }

        violations
    }
}

/// Serialized form: routes plus the derived totals, for consumers that read
/// the solution without this crate. Totals are recomputed on deserialization.
#[derive(Clone, Serialize, Deserialize)]
struct SolutionRepr {
    routes: Vec<Route>,
    capacity: u32,
    #[serde(default)]
    total_cost: f64,
    #[serde(default)]
    num_vehicles: usize,
    #[serde(default)]
    feasible: bool,
}

impl From<Solution> for SolutionRepr {
    fn from(solution: Solution) -> Self {
        Self {
            total_cost: solution.total_cost(),
            num_vehicles: solution.num_vehicles(),
            feasible: solution.is_feasible(),
            routes: solution.routes,
            capacity: solution.capacity,
        }
    }
}

impl From<SolutionRepr> for Solution {
    fn from(repr: SolutionRepr) -> Self {
        Self {
            routes: repr.routes,
            capacity: repr.capacity,
        }
    }
}
