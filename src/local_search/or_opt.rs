//! Intra-route Or-opt: move a chain of consecutive stops.
//!
//! # Algorithm
//!
//! For segment lengths `2..=3`, every segment `[from..from+len)` is moved
//! so that it starts at every other index `to` of the route, keeping its
//! orientation. Single stops are the relocate neighborhood and are not
//! repeated here. Each candidate is walked in full at its best departure and
//! the first improving feasible move is committed.
//!
//! # Complexity
//!
//! O(L²) candidates per segment length, capped by `max_attempts`, each
//! costing O(L).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Regional Blood Banking", PhD thesis,
//! Northwestern University.

use tracing::trace;

use crate::evaluation::{candidates, RouteEvaluator};
use crate::models::Solution;

use super::{judge, Operator};

/// Longest segment moved as one chain.
const MAX_SEGMENT: usize = 3;

/// Commits the first improving segment move in route `index`.
pub fn or_opt(solution: &mut Solution, evaluator: &RouteEvaluator<'_>, index: usize, max_attempts: usize) -> bool {
    let route = solution.route(index);
    let n = route.len();
    let ids = route.customer_ids();
    let old_cost = route.cost();
    let mut attempts = 0;

    // a segment needs at least one other stop to move around
    for len in 2..=MAX_SEGMENT.min(n.saturating_sub(1)) {
        for from in 0..=n - len {
            for to in 0..=n - len {
                if to == from {
                    continue;
                }
                if attempts >= max_attempts {
                    return false;
                }
                attempts += 1;

                let (departure, eval) = evaluator.evaluate_best(candidates::segment_moved(ids, from, len, to), 0.0);
                if judge(Operator::OrOpt, &[&eval], old_cost).is_ok() {
                    trace!(route = index, from, len, to, saving = old_cost - eval.cost, "or-opt");
                    solution.route_mut(index).move_segment(from, len, to, departure, &eval);
                    return true;
                }
            }
        }
    }
    false
}
