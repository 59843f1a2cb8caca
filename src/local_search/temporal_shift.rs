//! Temporal shift: delay the depot departure to absorb waiting.
//!
//! # Algorithm
//!
//! With the stop order fixed, delaying departure by `δ` pushes service at
//! stop `i` back by `max(0, δ − W≤i)`, where `W≤i` is the waiting
//! accumulated up to and including stop `i`. Stop `i` stays feasible while
//! `δ ≤ slack_i + W≤i`, and total waiting falls by `δ` as long as
//! `δ ≤ W_total`. The best delay is therefore
//!
//! ```text
//! δ* = min(W_total, min_i(slack_i + W≤i))
//! ```
//!
//! found in a single pass by [`walk_best`](crate::evaluation::walk_best),
//! which also prices every candidate sequence the other operators propose.
//!
//! # Complexity
//!
//! O(L) for a route of L stops.

use tracing::trace;

use crate::evaluation::{Evaluation, RouteEvaluator};
use crate::models::{Route, Solution};

use super::{judge, Operator};

/// A proposed departure delay for one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftPlan {
    /// Delay added to the current departure.
    pub delay: f64,
    /// New departure time.
    pub departure: f64,
    /// Evaluation of the route at the new departure.
    pub eval: Evaluation,
}

impl ShiftPlan {
    /// Computes the largest useful delay for `route`.
    ///
    /// Returns `None` for an empty or infeasible route, or when no delay
    /// lowers its cost.
    pub fn for_route(evaluator: &RouteEvaluator<'_>, route: &Route) -> Option<Self> {
        if route.is_empty() {
            return None;
        }

        let current = route.departure_time();
        let (departure, eval) = evaluator.evaluate_best(route.customer_ids().iter().copied(), current);
        if departure <= current {
            return None;
        }
        Some(Self {
            delay: departure - current,
            departure,
            eval,
        })
    }
}

/// Moves the departure of route `index` later if that lowers its cost.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance};
/// use mihmds::constructive::InsertionBuilder;
/// use mihmds::evaluation::RouteEvaluator;
/// use mihmds::local_search::temporal_shift;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// // arrives at 5 but cannot start before 20
/// let customers = vec![Customer::new(1, 3.0, 4.0, 10, 0.0).with_time_window(20.0, 100.0)];
/// let instance = Instance::new(depot, customers, 50).unwrap();
/// let mut solution = InsertionBuilder::new(&instance)
///     .build(&mut StdRng::seed_from_u64(0))
///     .unwrap();
/// assert!((solution.total_cost() - 25.0).abs() < 1e-9);
///
/// let evaluator = RouteEvaluator::new(&instance);
/// assert!(temporal_shift(&mut solution, &evaluator, 0));
/// assert!((solution.total_cost() - 10.0).abs() < 1e-6);
/// assert!((solution.route(0).departure_time() - 15.0).abs() < 1e-6);
/// ```
pub fn temporal_shift(solution: &mut Solution, evaluator: &RouteEvaluator<'_>, index: usize) -> bool {
    let route = solution.route(index);
    let Some(plan) = ShiftPlan::for_route(evaluator, route) else {
        return false;
    };
    if judge(Operator::TemporalShift, &[&plan.eval], route.cost()).is_err() {
        return false;
    }

    trace!(
        route = index,
        departure = plan.departure,
        saving = route.cost() - plan.eval.cost,
        "temporal shift"
    );
    solution.route_mut(index).shift_departure(plan.departure, &plan.eval);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Instance};

    fn route_solution(inst: &Instance, ids: &[usize]) -> Solution {
        let mut sol = Solution::new(inst.capacity());
        sol.push_route(RouteEvaluator::new(inst).build_route(ids));
        sol
    }

    #[test]
    fn test_absorbs_all_waiting() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![Customer::new(1, 3.0, 4.0, 10, 0.0).with_time_window(20.0, 100.0)];
        let inst = Instance::new(depot, customers, 50).expect("valid");
        let ev = RouteEvaluator::new(&inst);
        let mut sol = route_solution(&inst, &[1]);

        assert!(temporal_shift(&mut sol, &ev, 0));
        let route = sol.route(0);
        assert!((route.departure_time() - 15.0).abs() < 1e-6);
        assert!((route.cost() - 10.0).abs() < 1e-6);
        assert!(sol.verify(&inst).is_empty());

        // nothing left to absorb
        assert!(!temporal_shift(&mut sol, &ev, 0));
    }

    #[test]
    fn test_limited_by_earlier_slack() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![
            // arrive 5, start 5, slack 2
            Customer::new(1, 3.0, 4.0, 1, 0.0).with_time_window(0.0, 7.0),
            // arrive 10, wait 30
            Customer::new(2, 6.0, 8.0, 1, 0.0).with_time_window(40.0, 100.0),
        ];
        let inst = Instance::new(depot, customers, 50).expect("valid");
        let ev = RouteEvaluator::new(&inst);
        let mut sol = route_solution(&inst, &[1, 2]);
        let before = sol.total_cost();

        assert!(temporal_shift(&mut sol, &ev, 0));
        assert!((sol.route(0).departure_time() - 2.0).abs() < 1e-6);
        assert!((before - sol.total_cost() - 2.0).abs() < 1e-6);
        assert!(sol.verify(&inst).is_empty());
    }

    #[test]
    fn test_no_waiting_no_move() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![Customer::new(1, 3.0, 4.0, 10, 0.0)];
        let inst = Instance::new(depot, customers, 50).expect("valid");
        let ev = RouteEvaluator::new(&inst);
        let mut sol = route_solution(&inst, &[1]);
        let before = sol.clone();
        assert!(!temporal_shift(&mut sol, &ev, 0));
        assert_eq!(sol, before);
    }

    #[test]
    fn test_empty_route_has_no_plan() {
        let inst = Instance::new(Customer::depot(0.0, 0.0, 10.0), vec![], 10).expect("valid");
        let route = RouteEvaluator::new(&inst).build_route(&[]);
        assert!(ShiftPlan::for_route(&RouteEvaluator::new(&inst), &route).is_none());
    }
}
