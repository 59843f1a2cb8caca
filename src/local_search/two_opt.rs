//! Intra-route 2-opt.
//!
//! # Algorithm
//!
//! For each pair of positions `i < j` the segment `[i..=j]` is reversed:
//!
//! ```text
//! r₀…r_{i−1} r_j r_{j−1}…r_i r_{j+1}…
//! ```
//!
//! With time windows the gain is not a four-edge delta, since reversal
//! changes every arrival inside the segment, so each candidate is walked in
//! full and priced at its best departure. Adjacent pairs (`j = i + 1`) are
//! the swap neighborhood and are skipped. The first improving feasible
//! reversal is committed.
//!
//! # Complexity
//!
//! O(L²) candidates, capped by `max_attempts`, each costing O(L).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use tracing::trace;

use crate::evaluation::{candidates, RouteEvaluator};
use crate::models::Solution;

use super::{judge, Operator};

/// Commits the first improving segment reversal in route `index`.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance, Solution};
/// use mihmds::evaluation::RouteEvaluator;
/// use mihmds::local_search::two_opt;
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = (1..=4).map(|id| Customer::new(id, id as f64, 0.0, 1, 0.0)).collect();
/// let instance = Instance::new(depot, customers, 10).unwrap();
/// let evaluator = RouteEvaluator::new(&instance);
///
/// let mut solution = Solution::new(instance.capacity());
/// solution.push_route(evaluator.build_route(&[3, 2, 1, 4]));
/// assert!(two_opt(&mut solution, &evaluator, 0, 50));
/// assert_eq!(solution.route(0).customer_ids(), &[1, 2, 3, 4]);
/// ```
pub fn two_opt(solution: &mut Solution, evaluator: &RouteEvaluator<'_>, index: usize, max_attempts: usize) -> bool {
    let route = solution.route(index);
    let n = route.len();
    if n < 3 {
        return false;
    }

    let ids = route.customer_ids();
    let old_cost = route.cost();
    let mut attempts = 0;

    for i in 0..n - 2 {
        for j in i + 2..n {
            if attempts >= max_attempts {
                return false;
            }
            attempts += 1;

            let (departure, eval) = evaluator.evaluate_best(candidates::reversed(ids, i, j), 0.0);
            if judge(Operator::TwoOpt, &[&eval], old_cost).is_ok() {
                trace!(route = index, i, j, saving = old_cost - eval.cost, "2-opt");
                solution.route_mut(index).reverse(i, j, departure, &eval);
                return true;
            }
        }
    }
    false
}
