//! Customer relocation operator.
//!
//! # Algorithm
//!
//! First the intra-route neighborhood: every stop of the route is moved to
//! every other index of the same route. If nothing improves, each stop is
//! tried at every position of the other critical routes; an inter-route
//! move is accepted when the combined cost of both routes drops. Each phase
//! evaluates at most `max_attempts` candidates, and the first improving
//! candidate is committed. Candidates are priced at their best departure.
//!
//! A route emptied by an inter-route move stays in the solution as a
//! tombstone until the end of the round.
//!
//! # Complexity
//!
//! O(L²) candidates intra-route, O(L · Σ L_other) inter-route, each
//! capped by `max_attempts` and each costing one O(L) evaluation.

use tracing::trace;

use crate::evaluation::{candidates, RouteEvaluator};
use crate::models::Solution;

use super::{judge, Operator};

/// Commits the first improving relocation of a stop from route `index`.
///
/// `critical` lists the routes eligible as inter-route targets; `index`
/// itself and empty routes among them are skipped.
pub fn relocate(
    solution: &mut Solution,
    evaluator: &RouteEvaluator<'_>,
    index: usize,
    critical: &[usize],
    max_attempts: usize,
) -> bool {
    if solution.route(index).is_empty() {
        return false;
    }
    intra_route(solution, evaluator, index, max_attempts)
        || inter_route(solution, evaluator, index, critical, max_attempts)
}

fn intra_route(solution: &mut Solution, evaluator: &RouteEvaluator<'_>, index: usize, max_attempts: usize) -> bool {
    let route = solution.route(index);
    let n = route.len();
    if n < 2 {
        return false;
    }

    let ids = route.customer_ids();
    let old_cost = route.cost();
    let mut attempts = 0;

    for from in 0..n {
        for to in 0..n {
            // moving to `from - 1` duplicates the adjacent swap seen at `from - 1 → from`
            if to == from || to + 1 == from {
                continue;
            }
            if attempts >= max_attempts {
                return false;
            }
            attempts += 1;

            let (departure, eval) = evaluator.evaluate_best(candidates::relocated(ids, from, to), 0.0);
            if judge(Operator::Relocate, &[&eval], old_cost).is_ok() {
                trace!(route = index, from, to, saving = old_cost - eval.cost, "relocate");
                solution.route_mut(index).relocate(from, to, departure, &eval);
                return true;
            }
        }
    }
    false
}

fn inter_route(
    solution: &mut Solution,
    evaluator: &RouteEvaluator<'_>,
    index: usize,
    critical: &[usize],
    max_attempts: usize,
) -> bool {
    let instance = evaluator.instance();
    let capacity = solution.capacity();
    let mut attempts = 0;

    for &target in critical {
        if target == index || target >= solution.num_routes() || solution.route(target).is_empty() {
            continue;
        }
        let source = solution.route(index);
        let dest = solution.route(target);
        let old_cost = source.cost() + dest.cost();

        for from in 0..source.len() {
            let id = source.customer_ids()[from];
            let demand = instance.customer(id).map_or(u32::MAX, |c| c.demand());
            let fits = dest.load().checked_add(demand).is_some_and(|l| l <= capacity);
            if !fits {
                continue;
            }
            let (shrunk_departure, shrunk) =
                evaluator.evaluate_best(candidates::removed(source.customer_ids(), from), 0.0);

            for to in 0..=dest.len() {
                if attempts >= max_attempts {
                    return false;
                }
                attempts += 1;

                let (grown_departure, grown) =
                    evaluator.evaluate_best(candidates::inserted(dest.customer_ids(), to, id), 0.0);
                if judge(Operator::Relocate, &[&shrunk, &grown], old_cost).is_ok() {
                    trace!(
                        from_route = index,
                        to_route = target,
                        customer = id,
                        saving = old_cost - shrunk.cost - grown.cost,
                        "relocate across routes"
                    );
                    let (src, dst) = solution.pair_mut(index, target);
                    src.remove(from, shrunk_departure, &shrunk);
                    dst.insert(to, id, grown_departure, &grown);
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Instance};

    fn line_instance() -> Instance {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![
            Customer::new(1, 1.0, 0.0, 1, 0.0),
            Customer::new(2, 2.0, 0.0, 1, 0.0),
            Customer::new(3, 3.0, 0.0, 1, 0.0),
            Customer::new(4, 4.0, 0.0, 1, 0.0),
        ];
        Instance::new(depot, customers, 10).expect("valid")
    }

    fn solution(inst: &Instance, routes: &[&[usize]]) -> Solution {
        let ev = RouteEvaluator::new(inst);
        let mut sol = Solution::new(inst.capacity());
        for ids in routes {
            sol.push_route(ev.build_route(ids));
        }
        sol
    }

    #[test]
    fn test_intra_route_move() {
        let inst = line_instance();
        let ev = RouteEvaluator::new(&inst);
        // 0→4→1→2→3→0 = 4+3+1+1+3 = 12; optimal 8
        let mut sol = solution(&inst, &[&[4, 1, 2, 3]]);
        assert!(relocate(&mut sol, &ev, 0, &[0], 50));
        assert!(sol.total_cost() < 12.0 - 1e-6);
        assert!(sol.verify(&inst).is_empty());
    }

    #[test]
    fn test_inter_route_move_empties_source() {
        let inst = line_instance();
        let ev = RouteEvaluator::new(&inst);
        // route 1 serves 3 alone (cost 6); any slot on route 0 adds at most 4
        let mut sol = solution(&inst, &[&[1, 2, 4], &[3]]);
        let before = sol.total_cost();
        assert!(relocate(&mut sol, &ev, 1, &[0, 1], 50));
        assert!(sol.total_cost() < before);
        assert!(sol.route(1).is_empty());
        assert_eq!(sol.num_vehicles(), 1);
        assert_eq!(sol.route(0).len(), 4);
        assert!(sol.route(0).contains(3));
        assert_eq!(sol.compact(), 1);
        assert!(sol.verify(&inst).is_empty());
    }

    #[test]
    fn test_inter_route_respects_capacity() {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![
            Customer::new(1, 1.0, 0.0, 6, 0.0),
            Customer::new(2, 1.0, 0.0, 6, 0.0),
        ];
        let inst = Instance::new(depot, customers, 10).expect("valid");
        let ev = RouteEvaluator::new(&inst);
        let mut sol = solution(&inst, &[&[1], &[2]]);
        let before = sol.clone();
        assert!(!relocate(&mut sol, &ev, 1, &[0, 1], 50));
        assert_eq!(sol, before);
    }

    #[test]
    fn test_non_critical_targets_ignored() {
        let inst = line_instance();
        let ev = RouteEvaluator::new(&inst);
        let mut sol = solution(&inst, &[&[1, 2, 4], &[3]]);
        let before = sol.clone();
        assert!(!relocate(&mut sol, &ev, 1, &[1], 50));
        assert_eq!(sol, before);
    }
}
