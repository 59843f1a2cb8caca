//! Route type.

use serde::{Deserialize, Serialize};

use crate::evaluation::Evaluation;

/// An ordered sequence of customer ids served by one vehicle.
///
/// The depot is implicit at both ends and not stored. Load, cost, and
/// feasibility are cached from the last [`Evaluation`] applied to the route;
/// every mutation goes through a crate-internal method that takes the
/// evaluation of the new sequence, so the cache never drifts from the
/// contents.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance};
/// use mihmds::evaluation::RouteEvaluator;
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let instance = Instance::new(depot, vec![Customer::new(1, 3.0, 4.0, 10, 0.0)], 50).unwrap();
/// let route = RouteEvaluator::new(&instance).build_route(&[1]);
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.load(), 10);
/// assert!((route.cost() - 10.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    customer_ids: Vec<usize>,
    departure_time: f64,
    load: u32,
    cost: f64,
    feasible: bool,
}

impl Route {
    pub(crate) fn from_parts(customer_ids: Vec<usize>, departure_time: f64, eval: &Evaluation) -> Self {
        Self {
            customer_ids,
            departure_time,
            load: eval.load,
            cost: eval.cost,
            feasible: eval.feasible,
        }
    }

    /// Customer ids in visit order.
    pub fn customer_ids(&self) -> &[usize] {
        &self.customer_ids
    }

    /// Number of customer stops.
    pub fn len(&self) -> usize {
        self.customer_ids.len()
    }

    /// Returns `true` if the route serves no customer.
    pub fn is_empty(&self) -> bool {
        self.customer_ids.is_empty()
    }

    /// Departure time from the depot.
    pub fn departure_time(&self) -> f64 {
        self.departure_time
    }

    /// Total load carried.
    pub fn load(&self) -> u32 {
        self.load
    }

    /// Travel distance plus waiting time.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Whether the cached evaluation was feasible.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Returns `true` if this route visits `id`.
    pub fn contains(&self, id: usize) -> bool {
        self.customer_ids.contains(&id)
    }

    fn apply(&mut self, departure: f64, eval: &Evaluation) {
        self.departure_time = departure;
        self.load = eval.load;
        self.cost = eval.cost;
        self.feasible = eval.feasible;
    }

    /// Inserts `id` before `pos`. `eval` describes the new sequence when
    /// leaving the depot at `departure`; the same holds for every mutator
    /// below.
    pub(crate) fn insert(&mut self, pos: usize, id: usize, departure: f64, eval: &Evaluation) {
        self.customer_ids.insert(pos, id);
        self.apply(departure, eval);
    }

    /// Removes the stop at `pos`.
    pub(crate) fn remove(&mut self, pos: usize, departure: f64, eval: &Evaluation) -> usize {
        let id = self.customer_ids.remove(pos);
        self.apply(departure, eval);
        id
    }

    /// Exchanges stops `i` and `j`.
    pub(crate) fn swap(&mut self, i: usize, j: usize, departure: f64, eval: &Evaluation) {
        self.customer_ids.swap(i, j);
        self.apply(departure, eval);
    }

    /// Moves the stop at `from` so that it ends up at index `to`.
    pub(crate) fn relocate(&mut self, from: usize, to: usize, departure: f64, eval: &Evaluation) {
        let id = self.customer_ids.remove(from);
        self.customer_ids.insert(to, id);
        self.apply(departure, eval);
    }

    /// Reverses the stops `[i..=j]`.
    pub(crate) fn reverse(&mut self, i: usize, j: usize, departure: f64, eval: &Evaluation) {
        self.customer_ids[i..=j].reverse();
        self.apply(departure, eval);
    }

    /// Moves the `len` stops starting at `from` so that they start at `to`.
    pub(crate) fn move_segment(
        &mut self,
        from: usize,
        len: usize,
        to: usize,
        departure: f64,
        eval: &Evaluation,
    ) {
        let segment: Vec<usize> = self.customer_ids.drain(from..from + len).collect();
        let tail = self.customer_ids.split_off(to);
        self.customer_ids.extend(segment);
        self.customer_ids.extend(tail);
        self.apply(departure, eval);
    }

    /// Replaces the whole sequence.
    pub(crate) fn replace(&mut self, customer_ids: Vec<usize>, departure: f64, eval: &Evaluation) {
        self.customer_ids = customer_ids;
        self.apply(departure, eval);
    }

    /// Empties the route; it serves nothing and costs nothing.
    pub(crate) fn clear(&mut self) {
        self.customer_ids.clear();
        self.departure_time = 0.0;
        self.load = 0;
        self.cost = 0.0;
        self.feasible = true;
    }

    /// Detaches the tail starting at `cut`.
    ///
    /// Leaves the cached evaluation stale; callers must follow with
    /// [`Route::attach_tail`].
    pub(crate) fn detach_tail(&mut self, cut: usize) -> Vec<usize> {
        self.customer_ids.split_off(cut)
    }

    /// Appends a tail detached from another route.
    pub(crate) fn attach_tail(&mut self, tail: Vec<usize>, departure: f64, eval: &Evaluation) {
        self.customer_ids.extend(tail);
        self.apply(departure, eval);
    }

    /// Moves the depot departure; the sequence is unchanged.
    pub(crate) fn shift_departure(&mut self, departure: f64, eval: &Evaluation) {
        self.apply(departure, eval);
    }
}
