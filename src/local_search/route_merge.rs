//! Route merging: fold one whole route into another.
//!
//! # Algorithm
//!
//! For each source route, every other non-empty route whose load leaves
//! room for the whole source is tried as the destination. The source's
//! stops are inserted one by one, in visit order, at the cheapest feasible
//! position of the growing destination sequence. If every stop finds a
//! slot and the merged route, priced at its best departure, costs less than
//! the two routes together, the destination takes the merged sequence and
//! the source is emptied.
//!
//! The emptied source stays as a tombstone until the end of the round, so
//! route indices held by the caller remain valid.
//!
//! # Complexity
//!
//! O(|S| · |D|) evaluations per destination, each costing O(|S| + |D|);
//! destinations tried are capped by `max_attempts`.

use tracing::trace;

use crate::evaluation::{candidates, RouteEvaluator};
use crate::models::Solution;

use super::{judge, Operator};

/// Commits the first improving merge of a `sources` route into another route.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance, Solution};
/// use mihmds::evaluation::RouteEvaluator;
/// use mihmds::local_search::route_merge;
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = vec![Customer::new(1, 1.0, 0.0, 1, 0.0), Customer::new(2, 2.0, 0.0, 1, 0.0)];
/// let instance = Instance::new(depot, customers, 10).unwrap();
/// let evaluator = RouteEvaluator::new(&instance);
///
/// let mut solution = Solution::new(instance.capacity());
/// solution.push_route(evaluator.build_route(&[1]));
/// solution.push_route(evaluator.build_route(&[2]));
/// assert!(route_merge(&mut solution, &evaluator, &[1], 10));
/// assert_eq!(solution.num_vehicles(), 1);
/// ```
pub fn route_merge(
    solution: &mut Solution,
    evaluator: &RouteEvaluator<'_>,
    sources: &[usize],
    max_attempts: usize,
) -> bool {
    let capacity = solution.capacity();
    let mut attempts = 0;

    for &source in sources {
        if source >= solution.num_routes() || solution.route(source).is_empty() {
            continue;
        }
        for target in 0..solution.num_routes() {
            let (src, dst) = (solution.route(source), solution.route(target));
            if target == source || dst.is_empty() {
                continue;
            }
            let fits = dst.load().checked_add(src.load()).is_some_and(|l| l <= capacity);
            if !fits {
                continue;
            }
            if attempts >= max_attempts {
                return false;
            }
            attempts += 1;

            let Some(merged) = absorb(evaluator, dst.customer_ids(), src.customer_ids()) else {
                continue;
            };
            let (departure, eval) = evaluator.evaluate_best(merged.iter().copied(), 0.0);
            let old_cost = src.cost() + dst.cost();
            if judge(Operator::RouteMerge, &[&eval], old_cost).is_ok() {
                trace!(
                    from_route = source,
                    to_route = target,
                    stops = merged.len(),
                    saving = old_cost - eval.cost,
                    "route merge"
                );
                let (src, dst) = solution.pair_mut(source, target);
                dst.replace(merged, departure, &eval);
                src.clear();
                return true;
            }
        }
    }
    false
}

/// Inserts each of `incoming`, in order, at its cheapest feasible position
/// of `base`. Returns `None` as soon as one stop fits nowhere.
fn absorb(evaluator: &RouteEvaluator<'_>, base: &[usize], incoming: &[usize]) -> Option<Vec<usize>> {
    let mut merged = Vec::with_capacity(base.len() + incoming.len());
    merged.extend_from_slice(base);

    for &id in incoming {
        let mut best: Option<(usize, f64)> = None;
        for pos in 0..=merged.len() {
            let eval = evaluator.evaluate(candidates::inserted(&merged, pos, id));
            if eval.feasible && best.is_none_or(|(_, cost)| eval.cost < cost) {
                best = Some((pos, eval.cost));
            }
        }
        let (pos, _) = best?;
        merged.insert(pos, id);
    }
    Some(merged)
}
