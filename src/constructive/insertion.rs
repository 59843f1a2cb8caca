//! Limited-candidate insertion heuristic for VRPTW.
//!
//! # Algorithm
//!
//! Customers are placed one at a time in a fixed order. For each customer,
//! the candidate pool is every (route, position) slot of the partial
//! solution; a route of `n` stops offers `n + 1` slots. Only
//!
//! ```text
//! k = min(|pool|, max(min_candidates, ⌈ratio · |pool|⌉))
//! ```
//!
//! slots are drawn from the pool with a seeded random source and evaluated.
//! The customer goes to the sampled feasible slot with the smallest cost
//! increase. If none of the sampled slots is feasible, the remaining slots
//! are scanned before a new route is opened. A customer that cannot be
//! served even by a route of its own makes the instance invalid.
//!
//! Under-sampling trades insertion quality for bounded construction work;
//! the local-search phase repairs the gap.
//!
//! # Complexity
//!
//! O(n · k · L) evaluations where `L` is the route length, against
//! O(n · |pool| · L) for exhaustive cheapest insertion.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{InvalidReason, SolveError};
use crate::evaluation::{candidates, Evaluation, RouteEvaluator};
use crate::models::{Customer, Instance, Route, Solution};

/// Order in which the builder places customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertionOrder {
    /// Catalog order.
    Input,
    /// Earliest due date first, then nearest to the depot, then catalog
    /// order.
    #[default]
    Urgency,
}

impl InsertionOrder {
    /// Catalog positions of the instance's customers in placement order.
    pub fn sequence(self, instance: &Instance) -> Vec<usize> {
        let mut order: Vec<usize> = (0..instance.num_customers()).collect();
        if self == InsertionOrder::Urgency {
            let depot = instance.depot();
            let customers = instance.customers();
            order.sort_by(|&a, &b| {
                let (ca, cb) = (&customers[a], &customers[b]);
                ca.time_window()
                    .due()
                    .total_cmp(&cb.time_window().due())
                    .then_with(|| depot.distance_to(ca).total_cmp(&depot.distance_to(cb)))
                    .then_with(|| a.cmp(&b))
            });
        }
        order
    }
}

/// Best slot found so far for the customer being placed.
#[derive(Debug, Clone, Copy)]
struct Slot {
    route: usize,
    position: usize,
    delta: f64,
    eval: Evaluation,
}

/// Builds an initial solution by limited-candidate insertion.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance};
/// use mihmds::constructive::InsertionBuilder;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = vec![
///     Customer::new(1, 10.0, 0.0, 10, 0.0),
///     Customer::new(2, 0.0, 10.0, 10, 0.0),
///     Customer::new(3, -10.0, 0.0, 10, 0.0),
/// ];
/// let instance = Instance::new(depot, customers, 100).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let solution = InsertionBuilder::new(&instance).build(&mut rng).unwrap();
/// assert_eq!(solution.num_served(), 3);
/// assert_eq!(solution.num_vehicles(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InsertionBuilder<'a> {
    evaluator: RouteEvaluator<'a>,
    candidate_ratio: f64,
    min_candidates: usize,
    order: InsertionOrder,
}

impl<'a> InsertionBuilder<'a> {
    /// Creates a builder with ratio 0.3, a floor of 3 candidates, and
    /// urgency order.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            evaluator: RouteEvaluator::new(instance),
            candidate_ratio: 0.3,
            min_candidates: 3,
            order: InsertionOrder::default(),
        }
    }

    /// Sets the fraction of slots sampled per customer.
    pub fn with_candidate_ratio(mut self, ratio: f64) -> Self {
        self.candidate_ratio = ratio;
        self
    }

    /// Sets the minimum number of slots sampled per customer.
    pub fn with_min_candidates(mut self, min: usize) -> Self {
        self.min_candidates = min;
        self
    }

    /// Sets the placement order.
    pub fn with_order(mut self, order: InsertionOrder) -> Self {
        self.order = order;
        self
    }

    /// Number of slots to sample from a pool of `pool` slots.
    pub fn sample_size(&self, pool: usize) -> usize {
        let proportional = (self.candidate_ratio * pool as f64).ceil() as usize;
        self.min_candidates.max(proportional).min(pool)
    }

    /// Places every customer of the instance.
    ///
    /// Returns [`SolveError::InvalidInstance`] for the first customer that
    /// cannot be served by a dedicated vehicle.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolveError> {
        let instance = self.evaluator.instance();
        let mut solution = Solution::new(instance.capacity());

        for pos in self.order.sequence(instance) {
            let customer = &instance.customers()[pos];
            match self.best_slot(&solution, customer, rng) {
                Some(slot) => {
                    trace!(
                        customer = customer.id(),
                        route = slot.route,
                        position = slot.position,
                        delta = slot.delta,
                        "inserted"
                    );
                    solution
                        .route_mut(slot.route)
                        .insert(slot.position, customer.id(), 0.0, &slot.eval);
                }
                None => {
                    let route = self.open_route(customer)?;
                    let index = solution.push_route(route);
                    debug!(customer = customer.id(), route = index, "opened route");
                }
            }
        }

        Ok(solution)
    }

    fn best_slot<R: Rng>(&self, solution: &Solution, customer: &Customer, rng: &mut R) -> Option<Slot> {
        let pool: usize = solution.routes().iter().map(|r| r.len() + 1).sum();
        if pool == 0 {
            return None;
        }

        let k = self.sample_size(pool);
        if k < pool {
            let mut picks = rand::seq::index::sample(rng, pool, k).into_vec();
            picks.sort_unstable();
            let best = self.scan(solution, customer, picks.into_iter());
            if best.is_some() {
                return best;
            }
        }
        self.scan(solution, customer, 0..pool)
    }

    /// Evaluates the slots at the given flat indices, which must ascend.
    ///
    /// Ascending order plus a strict comparison breaks ties by lowest route
    /// index, then lowest position.
    fn scan<I>(&self, solution: &Solution, customer: &Customer, flat: I) -> Option<Slot>
    where
        I: Iterator<Item = usize>,
    {
        let capacity = solution.capacity();
        let mut flat = flat.peekable();
        let mut best: Option<Slot> = None;
        let mut offset = 0;

        for (route_index, route) in solution.routes().iter().enumerate() {
            let slots = route.len() + 1;
            let fits = route
                .load()
                .checked_add(customer.demand())
                .is_some_and(|l| l <= capacity);

            while let Some(&index) = flat.peek() {
                if index >= offset + slots {
                    break;
                }
                flat.next();
                if !fits {
                    continue;
                }
                let position = index - offset;
                if let Some(slot) = self.try_slot(route_index, route, position, customer) {
                    if best.as_ref().is_none_or(|b| slot.delta < b.delta) {
                        best = Some(slot);
                    }
                }
            }
            offset += slots;
        }
        best
    }

    fn try_slot(&self, route_index: usize, route: &Route, position: usize, customer: &Customer) -> Option<Slot> {
        let eval = self
            .evaluator
            .evaluate(candidates::inserted(route.customer_ids(), position, customer.id()));
        eval.feasible.then(|| Slot {
            route: route_index,
            position,
            delta: eval.cost - route.cost(),
            eval,
        })
    }

    fn open_route(&self, customer: &Customer) -> Result<Route, SolveError> {
        if self.evaluator.singleton(customer).feasible {
            return Ok(self.evaluator.build_route(&[customer.id()]));
        }
        Err(SolveError::InvalidInstance {
            customer_id: customer.id(),
            reason: self.diagnose(customer),
        })
    }

    fn diagnose(&self, customer: &Customer) -> InvalidReason {
        let tw = customer.time_window();
        let capacity = self.evaluator.capacity();
        if !tw.is_well_formed() {
            InvalidReason::MalformedWindow {
                ready: tw.ready(),
                due: tw.due(),
            }
        } else if customer.demand() > capacity {
            InvalidReason::DemandExceedsCapacity {
                demand: customer.demand(),
                capacity,
            }
        } else {
            InvalidReason::UnreachableWindow {
                earliest_arrival: self.evaluator.instance().depot().distance_to(customer),
                due: tw.due(),
            }
        }
    }
}
