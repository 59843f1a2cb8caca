//! Intra-route swap operator.
//!
//! Exchanges two stops of the same route. Pairs are scanned in
//! lexicographic order `(i, j)`, `i < j`, and the first improving feasible
//! swap is committed. The scan stops after `max_attempts` evaluated pairs.

use tracing::trace;

use crate::evaluation::{candidates, RouteEvaluator};
use crate::models::Solution;

use super::{judge, Operator};

/// Commits the first improving swap in route `index`.
///
/// Each candidate is priced at its own best departure, so a route whose
/// departure was already shifted compares against candidates that can
/// shift too.
pub fn swap(solution: &mut Solution, evaluator: &RouteEvaluator<'_>, index: usize, max_attempts: usize) -> bool {
    let route = solution.route(index);
    let n = route.len();
    if n < 2 {
        return false;
    }

    let ids = route.customer_ids();
    let old_cost = route.cost();
    let mut attempts = 0;

    for i in 0..n - 1 {
        for j in i + 1..n {
            if attempts >= max_attempts {
                return false;
            }
            attempts += 1;

            let (departure, eval) = evaluator.evaluate_best(candidates::swapped(ids, i, j), 0.0);
            if judge(Operator::Swap, &[&eval], old_cost).is_ok() {
                trace!(route = index, i, j, saving = old_cost - eval.cost, "swap");
                solution.route_mut(index).swap(i, j, departure, &eval);
                return true;
            }
        }
    }
    false
}
