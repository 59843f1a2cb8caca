//! Route evaluator: schedule, load, cost, and feasibility of a stop sequence.
//!
//! # Cost model
//!
//! ```text
//! cost = Σ travel(prev, next)  (depot → … → depot)
//!      + Σ max(0, ready − arrival)
//! ```
//!
//! A stop is infeasible when the cumulative load exceeds capacity or when
//! service would start after the due date. The walk short-circuits on the
//! first infeasible stop; the cost of an infeasible evaluation is
//! `f64::INFINITY` and must not be compared. The depot's due date does not
//! bind the return leg.
//!
//! Nothing is cached between calls. Every query recomputes geometry from
//! coordinates.

use crate::models::{Customer, Instance, Route, Site};

/// Summary of one walk over a stop sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Travel distance plus waiting time.
    pub cost: f64,
    /// Travel distance including the return leg.
    pub distance: f64,
    /// Total waiting time before service starts.
    pub waiting: f64,
    /// Total load carried.
    pub load: u32,
    /// Number of customer stops walked.
    pub stops: usize,
    /// Sum of `due − service_start` over all stops.
    pub total_slack: f64,
    /// Smallest `due − service_start` over all stops.
    pub min_slack: f64,
    /// Arrival time back at the depot.
    pub return_time: f64,
    /// `false` if any stop violated capacity or its time window.
    pub feasible: bool,
}

impl Evaluation {
    fn empty(departure: f64) -> Self {
        Self {
            cost: 0.0,
            distance: 0.0,
            waiting: 0.0,
            load: 0,
            stops: 0,
            total_slack: 0.0,
            min_slack: f64::INFINITY,
            return_time: departure,
            feasible: true,
        }
    }

    fn infeasible(stops: usize) -> Self {
        Self {
            cost: f64::INFINITY,
            distance: f64::INFINITY,
            waiting: f64::INFINITY,
            load: 0,
            stops,
            total_slack: 0.0,
            min_slack: f64::NEG_INFINITY,
            return_time: f64::INFINITY,
            feasible: false,
        }
    }

    /// Average slack per stop; zero for an empty route.
    pub fn average_slack(&self) -> f64 {
        if self.stops == 0 {
            0.0
        } else {
            self.total_slack / self.stops as f64
        }
    }
}

/// Timing and load at a single stop, as seen by [`walk`] callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    /// Position in the sequence.
    pub position: usize,
    /// Arrival time.
    pub arrival: f64,
    /// Waiting time before the window opens.
    pub wait: f64,
    /// Service start (`arrival + wait`).
    pub start: f64,
    /// Departure after service.
    pub departure: f64,
    /// Cumulative load after this stop.
    pub load: u32,
    /// `due − start`.
    pub slack: f64,
}

/// A scheduled customer visit, reported by [`RouteEvaluator::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Visit {
    /// Customer being visited.
    pub customer_id: usize,
    /// Arrival time.
    pub arrival_time: f64,
    /// Waiting time before service.
    pub wait: f64,
    /// Service start.
    pub service_start: f64,
    /// Departure after service.
    pub departure_time: f64,
    /// Cumulative load after this visit.
    pub load_after: u32,
    /// Time-window slack at service start.
    pub slack: f64,
}

/// Walks a sequence of sites from the depot and back.
///
/// This is the single place where route cost and feasibility are computed;
/// every other component (including the primitive tail-exchange kernel)
/// goes through it. `None` items denote unknown stops and make the walk
/// infeasible. `on_stop` is called for every feasible stop in order.
pub fn walk<I, F>(depot: &Site, capacity: u32, sites: I, departure: f64, mut on_stop: F) -> Evaluation
where
    I: IntoIterator<Item = Option<Site>>,
    F: FnMut(&Stop),
{
    let mut eval = Evaluation::empty(departure);
    let mut time = departure;
    let mut load: u32 = 0;
    let mut prev = *depot;

    for (position, site) in sites.into_iter().enumerate() {
        let Some(site) = site else {
            return Evaluation::infeasible(position);
        };

        load = match load.checked_add(site.demand) {
            Some(l) if l <= capacity => l,
            _ => return Evaluation::infeasible(position),
        };

        let travel = prev.distance_to(&site);
        let arrival = time + travel;
        let window = site.window();
        let wait = window.waiting_time(arrival);
        let start = arrival + wait;
        if window.is_violated(start) {
            return Evaluation::infeasible(position);
        }

        let slack = site.due - start;
        let departure = start + site.service;
        on_stop(&Stop {
            position,
            arrival,
            wait,
            start,
            departure,
            load,
            slack,
        });

        eval.distance += travel;
        eval.waiting += wait;
        eval.total_slack += slack;
        eval.min_slack = eval.min_slack.min(slack);
        eval.stops += 1;

        time = departure;
        prev = site;
    }

    if eval.stops > 0 {
        let back = prev.distance_to(depot);
        eval.distance += back;
        eval.return_time = time + back;
    }
    eval.load = load;
    eval.cost = eval.distance + eval.waiting;
    eval
}

/// Margin kept below the exact shift bound so the binding stop stays on time
/// under rounding.
pub const SHIFT_MARGIN: f64 = 1e-9;

/// Walks a sequence at the departure that absorbs the most waiting.
///
/// With the stop order fixed, delaying departure by `δ` pushes service at
/// stop `i` back by `max(0, δ − W≤i)`, where `W≤i` is the waiting
/// accumulated up to and including stop `i`. Stop `i` stays on time while
/// `δ ≤ slack_i + W≤i`, and total waiting falls by `δ` while `δ ≤ W_total`:
///
/// ```text
/// δ* = min(W_total, min_i(slack_i + W≤i))
/// ```
///
/// Returns the chosen departure and the evaluation there. `departure` is
/// kept when the sequence is infeasible, has no waiting, or the shifted
/// walk is not cheaper.
pub fn walk_best<I>(depot: &Site, capacity: u32, sites: I, departure: f64) -> (f64, Evaluation)
where
    I: IntoIterator<Item = Option<Site>>,
    I::IntoIter: Clone,
{
    let sites = sites.into_iter();
    let mut waited = 0.0;
    let mut bound = f64::INFINITY;
    let base = walk(depot, capacity, sites.clone(), departure, |stop| {
        waited += stop.wait;
        bound = bound.min(stop.slack + waited);
    });
    if !base.feasible || base.waiting <= 0.0 {
        return (departure, base);
    }

    let delay = base.waiting.min(bound) - SHIFT_MARGIN;
    if delay <= 0.0 {
        return (departure, base);
    }
    let shifted = walk(depot, capacity, sites, departure + delay, |_| {});
    if shifted.feasible && shifted.cost < base.cost {
        (departure + delay, shifted)
    } else {
        (departure, base)
    }
}

/// Evaluates customer-id sequences against an [`Instance`].
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance};
/// use mihmds::evaluation::RouteEvaluator;
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = vec![
///     Customer::new(1, 3.0, 4.0, 10, 5.0),
///     Customer::new(2, 6.0, 8.0, 20, 5.0),
/// ];
/// let instance = Instance::new(depot, customers, 100).unwrap();
/// let evaluator = RouteEvaluator::new(&instance);
///
/// let eval = evaluator.evaluate([1, 2]);
/// assert!(eval.feasible);
/// // 0→1 = 5, 1→2 = 5, 2→0 = 10
/// assert!((eval.cost - 20.0).abs() < 1e-10);
/// assert_eq!(eval.load, 30);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteEvaluator<'a> {
    instance: &'a Instance,
    depot: Site,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates an evaluator for the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            depot: instance.depot().site(),
        }
    }

    /// The instance being evaluated against.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> u32 {
        self.instance.capacity()
    }

    /// Evaluates a sequence departing the depot at time zero.
    pub fn evaluate<I>(&self, ids: I) -> Evaluation
    where
        I: IntoIterator<Item = usize>,
    {
        self.evaluate_at(ids, 0.0)
    }

    /// Evaluates a sequence departing the depot at `departure`.
    pub fn evaluate_at<I>(&self, ids: I, departure: f64) -> Evaluation
    where
        I: IntoIterator<Item = usize>,
    {
        self.inspect(ids, departure, |_| {})
    }

    /// Evaluates a sequence at its best departure no earlier than
    /// `departure`; see [`walk_best`].
    pub fn evaluate_best<I>(&self, ids: I, departure: f64) -> (f64, Evaluation)
    where
        I: IntoIterator<Item = usize>,
        I::IntoIter: Clone,
    {
        let sites = ids.into_iter().map(|id| self.instance.site(id));
        walk_best(&self.depot, self.instance.capacity(), sites, departure)
    }

    /// Evaluates a route at its own departure time.
    pub fn evaluate_route(&self, route: &Route) -> Evaluation {
        self.evaluate_at(route.customer_ids().iter().copied(), route.departure_time())
    }

    /// Evaluates a sequence, reporting every feasible stop to `on_stop`.
    pub fn inspect<I, F>(&self, ids: I, departure: f64, on_stop: F) -> Evaluation
    where
        I: IntoIterator<Item = usize>,
        F: FnMut(&Stop),
    {
        let sites = ids.into_iter().map(|id| self.instance.site(id));
        walk(&self.depot, self.instance.capacity(), sites, departure, on_stop)
    }

    /// Full per-visit schedule of a sequence.
    ///
    /// Visits are reported up to (excluding) the first infeasible stop.
    pub fn schedule(&self, ids: &[usize], departure: f64) -> (Vec<Visit>, Evaluation) {
        let mut visits = Vec::with_capacity(ids.len());
        let eval = self.inspect(ids.iter().copied(), departure, |stop| {
            visits.push(Visit {
                customer_id: ids[stop.position],
                arrival_time: stop.arrival,
                wait: stop.wait,
                service_start: stop.start,
                departure_time: stop.departure,
                load_after: stop.load,
                slack: stop.slack,
            });
        });
        (visits, eval)
    }

    /// Builds a route departing at time zero and caches its evaluation.
    pub fn build_route(&self, ids: &[usize]) -> Route {
        let eval = self.evaluate(ids.iter().copied());
        Route::from_parts(ids.to_vec(), 0.0, &eval)
    }

    /// Evaluates the singleton route `depot → customer → depot`.
    pub fn singleton(&self, customer: &Customer) -> Evaluation {
        walk(
            &self.depot,
            self.instance.capacity(),
            std::iter::once(Some(customer.site())),
            0.0,
            |_| {},
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(capacity: u32) -> Instance {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![
            Customer::new(1, 3.0, 4.0, 10, 5.0),
            Customer::new(2, 6.0, 8.0, 20, 5.0),
            Customer::new(3, 0.0, 10.0, 15, 5.0),
        ];
        Instance::new(depot, customers, capacity).expect("valid")
    }

    #[test]
    fn test_empty_sequence() {
        let inst = setup(50);
        let eval = RouteEvaluator::new(&inst).evaluate(std::iter::empty());
        assert!(eval.feasible);
        assert_eq!(eval.cost, 0.0);
        assert_eq!(eval.stops, 0);
    }

    #[test]
    fn test_single_stop() {
        let inst = setup(50);
        let eval = RouteEvaluator::new(&inst).evaluate([1]);
        assert!(eval.feasible);
        assert!((eval.distance - 10.0).abs() < 1e-10);
        assert_eq!(eval.waiting, 0.0);
        assert_eq!(eval.load, 10);
        // arrive 5, serve 5, back at 15
        assert!((eval.return_time - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_capacity_short_circuit() {
        let inst = setup(25);
        // 10 + 20 > 25 at the second stop
        let eval = RouteEvaluator::new(&inst).evaluate([1, 2, 3]);
        assert!(!eval.feasible);
        assert_eq!(eval.stops, 1);
        assert!(eval.cost.is_infinite());
    }

    #[test]
    fn test_waiting_counts_as_cost() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![Customer::new(1, 3.0, 4.0, 10, 5.0).with_time_window(20.0, 100.0)];
        let inst = Instance::new(depot, customers, 100).expect("valid");
        let eval = RouteEvaluator::new(&inst).evaluate([1]);
        assert!(eval.feasible);
        assert!((eval.waiting - 15.0).abs() < 1e-10);
        assert!((eval.cost - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_departure_reduces_waiting() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![Customer::new(1, 3.0, 4.0, 10, 5.0).with_time_window(20.0, 100.0)];
        let inst = Instance::new(depot, customers, 100).expect("valid");
        let eval = RouteEvaluator::new(&inst).evaluate_at([1], 15.0);
        assert_eq!(eval.waiting, 0.0);
        assert!((eval.cost - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_best_departure_absorbs_waiting() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![
            // arrive 5, start 5, slack 2
            Customer::new(1, 3.0, 4.0, 1, 0.0).with_time_window(0.0, 7.0),
            // arrive 10, wait 30
            Customer::new(2, 6.0, 8.0, 1, 0.0).with_time_window(40.0, 100.0),
        ];
        let inst = Instance::new(depot, customers, 10).expect("valid");
        let ev = RouteEvaluator::new(&inst);
        let at_zero = ev.evaluate([1, 2]);
        let (departure, best) = ev.evaluate_best([1, 2], 0.0);
        // limited by the slack of the first stop
        assert!((departure - 2.0).abs() < 1e-6);
        assert!(best.feasible);
        assert!((at_zero.cost - best.cost - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_best_departure_keeps_start_without_waiting() {
        let inst = setup(100);
        let ev = RouteEvaluator::new(&inst);
        let (departure, best) = ev.evaluate_best([1, 2], 3.0);
        assert_eq!(departure, 3.0);
        assert_eq!(best, ev.evaluate_at([1, 2], 3.0));
        let (departure, infeasible) = RouteEvaluator::new(&setup(15)).evaluate_best([1, 2], 0.0);
        assert_eq!(departure, 0.0);
        assert!(!infeasible.feasible);
    }

    #[test]
    fn test_time_window_violation() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![Customer::new(1, 3.0, 4.0, 10, 5.0).with_time_window(0.0, 3.0)];
        let inst = Instance::new(depot, customers, 100).expect("valid");
        assert!(!RouteEvaluator::new(&inst).evaluate([1]).feasible);
    }

    #[test]
    fn test_inverted_window_is_infeasible() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![Customer::new(1, 1.0, 0.0, 1, 0.0).with_time_window(100.0, 50.0)];
        let inst = Instance::new(depot, customers, 100).expect("valid");
        let eval = RouteEvaluator::new(&inst);
        assert!(!eval.singleton(&inst.customers()[0]).feasible);
    }

    #[test]
    fn test_unknown_id_is_infeasible() {
        let inst = setup(50);
        assert!(!RouteEvaluator::new(&inst).evaluate([1, 42]).feasible);
    }

    #[test]
    fn test_return_leg_ignores_depot_due() {
        let depot = Customer::depot(0.0, 0.0, 1.0);
        let customers = vec![Customer::new(1, 3.0, 4.0, 10, 0.0)];
        let inst = Instance::new(depot, customers, 100).expect("valid");
        let eval = RouteEvaluator::new(&inst).evaluate([1]);
        assert!(eval.feasible);
        assert!((eval.return_time - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_schedule_timing_chain() {
        let inst = setup(100);
        let (visits, eval) = RouteEvaluator::new(&inst).schedule(&[1, 2], 0.0);
        assert!(eval.feasible);
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].customer_id, 1);
        assert!((visits[0].arrival_time - 5.0).abs() < 1e-10);
        assert!((visits[0].departure_time - 10.0).abs() < 1e-10);
        let leg = inst.customers()[0].distance_to(&inst.customers()[1]);
        assert!((visits[1].arrival_time - (10.0 + leg)).abs() < 1e-10);
        assert_eq!(visits[1].load_after, 30);
    }

    #[test]
    fn test_slack_tracking() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![
            Customer::new(1, 3.0, 4.0, 1, 0.0).with_time_window(0.0, 15.0),
            Customer::new(2, 6.0, 8.0, 1, 0.0).with_time_window(0.0, 100.0),
        ];
        let inst = Instance::new(depot, customers, 10).expect("valid");
        let eval = RouteEvaluator::new(&inst).evaluate([1, 2]);
        // start 5 (slack 10), start 10 (slack 90)
        assert!((eval.min_slack - 10.0).abs() < 1e-10);
        assert!((eval.average_slack() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_build_route_caches_evaluation() {
        let inst = setup(100);
        let evaluator = RouteEvaluator::new(&inst);
        let route = evaluator.build_route(&[1, 2]);
        assert_eq!(route.customer_ids(), &[1, 2]);
        assert_eq!(route.load(), 30);
        assert!(route.is_feasible());
        assert_eq!(route.cost(), evaluator.evaluate_route(&route).cost);
    }
}
