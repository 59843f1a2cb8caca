//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! For routes `A = a₀…a_m` and `B = b₀…b_n` and cut points `i ∈ [0, m]`,
//! `j ∈ [0, n]`, the candidates are
//!
//! ```text
//! A' = a₀…a_{i−1} b_j…b_{n−1}
//! B' = b₀…b_{j−1} a_i…a_{m−1}
//! ```
//!
//! The two trivial cuts (`i = j = 0` relabels the routes, `i = m, j = n`
//! changes nothing) are skipped. A cut whose combined load already exceeds
//! capacity is rejected from prefix sums without walking the route. The
//! first pair of feasible candidates whose combined cost, each priced at its
//! best departure, beats the original by more than epsilon is returned. Cuts that empty one side merge the two
//! routes.
//!
//! The search itself is [`find_tail_exchange`], a pure function over a
//! flat [`Site`] table and site-index routes, independent of [`Solution`].
//!
//! # Complexity
//!
//! O(Σ (m+1)(n+1)) cut pairs over all route pairs, capped by
//! `max_attempts`, each costing O(m + n).
//!
//! # Reference
//!
//! Potvin, J.-Y., Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *JORS* 46(12), 1433-1446.

use tracing::trace;

use crate::evaluation::{candidates, improves, walk, walk_best, Evaluation, RouteEvaluator};
use crate::models::{Site, Solution};

use super::{judge, Operator};

/// A route in kernel form.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelRoute {
    /// Site-table indices in visit order; `0` is the depot and never
    /// appears here.
    pub stops: Vec<usize>,
    /// Departure time from the depot.
    pub departure: f64,
}

/// An improving tail exchange found by [`find_tail_exchange`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailExchange {
    /// Index of the first route in the input slice.
    pub a: usize,
    /// Index of the second route in the input slice.
    pub b: usize,
    /// Cut position in route `a`.
    pub cut_a: usize,
    /// Cut position in route `b`.
    pub cut_b: usize,
    /// Cost of the new route `a` at its best departure.
    pub cost_a: f64,
    /// Cost of the new route `b` at its best departure.
    pub cost_b: f64,
    /// Cut pairs evaluated, including this one.
    pub attempts: usize,
}

/// Searches route pairs for the first improving tail exchange.
///
/// `sites[0]` is the depot. Route pairs are visited in `(a, b)`, `a < b`
/// order and cut pairs in `(cut_a, cut_b)` order; empty routes are skipped.
/// Returns `None` when no improving exchange exists within `max_attempts`
/// evaluated cut pairs.
///
/// # Examples
///
/// ```
/// use mihmds::models::Site;
/// use mihmds::local_search::{find_tail_exchange, KernelRoute};
///
/// let site = |x: f64| Site { x, y: 0.0, demand: 1, ready: 0.0, due: 1000.0, service: 0.0 };
/// let sites = [site(0.0), site(1.0), site(2.0)];
/// let routes = [
///     KernelRoute { stops: vec![1], departure: 0.0 },
///     KernelRoute { stops: vec![2], departure: 0.0 },
/// ];
///
/// // two out-and-back trips (2 + 4) merge into one (4)
/// let found = find_tail_exchange(&sites, 10, &routes, 100).unwrap();
/// assert!((found.cost_a + found.cost_b - 4.0).abs() < 1e-10);
/// ```
pub fn find_tail_exchange(
    sites: &[Site],
    capacity: u32,
    routes: &[KernelRoute],
    max_attempts: usize,
) -> Option<TailExchange> {
    let depot = sites.first()?;

    let prefix_loads: Vec<Vec<u64>> = routes
        .iter()
        .map(|r| {
            std::iter::once(0)
                .chain(r.stops.iter().scan(0u64, |acc, &i| {
                    let demand = sites.get(i).map_or(u64::MAX, |s| u64::from(s.demand));
                    *acc = acc.saturating_add(demand);
                    Some(*acc)
                }))
                .collect()
        })
        .collect();
    let current: Vec<Evaluation> = routes
        .iter()
        .map(|r| walk(depot, capacity, located(sites, r.stops.iter().copied()), r.departure, |_| {}))
        .collect();

    let limit = u64::from(capacity);
    let mut attempts = 0;

    for a in 0..routes.len() {
        for b in a + 1..routes.len() {
            let (ra, rb) = (&routes[a].stops, &routes[b].stops);
            if ra.is_empty() || rb.is_empty() || !current[a].feasible || !current[b].feasible {
                continue;
            }
            let (pa, pb) = (&prefix_loads[a], &prefix_loads[b]);
            let (m, n) = (ra.len(), rb.len());
            let old_cost = current[a].cost + current[b].cost;

            for cut_a in 0..=m {
                for cut_b in 0..=n {
                    if (cut_a == 0 && cut_b == 0) || (cut_a == m && cut_b == n) {
                        continue;
                    }
                    if attempts >= max_attempts {
                        return None;
                    }
                    attempts += 1;

                    let load_a = pa[cut_a].saturating_add(pb[n] - pb[cut_b]);
                    let load_b = pb[cut_b].saturating_add(pa[m] - pa[cut_a]);
                    if load_a > limit || load_b > limit {
                        continue;
                    }

                    let head_a = candidates::spliced(&ra[..cut_a], &rb[cut_b..]);
                    let (_, new_a) = walk_best(depot, capacity, located(sites, head_a), 0.0);
                    if !new_a.feasible {
                        continue;
                    }
                    let head_b = candidates::spliced(&rb[..cut_b], &ra[cut_a..]);
                    let (_, new_b) = walk_best(depot, capacity, located(sites, head_b), 0.0);
                    if new_b.feasible && improves(new_a.cost + new_b.cost, old_cost) {
                        return Some(TailExchange {
                            a,
                            b,
                            cut_a,
                            cut_b,
                            cost_a: new_a.cost,
                            cost_b: new_b.cost,
                            attempts,
                        });
                    }
                }
            }
        }
    }
    None
}

/// Site-table indices resolved to sites; out-of-range indices are `None`.
fn located<'s, I>(sites: &'s [Site], stops: I) -> impl Iterator<Item = Option<Site>> + Clone + 's
where
    I: Iterator<Item = usize> + Clone + 's,
{
    stops.map(move |i| sites.get(i).copied())
}

/// Commits the first improving tail exchange among the `critical` routes.
///
/// `sites` must be the instance's [`site table`](crate::models::Instance::site_table).
/// The routes are copied into kernel form, searched, and the winning cut is
/// spliced into both routes in place. A side left empty stays as a
/// tombstone until the end of the round.
pub fn tail_exchange(
    solution: &mut Solution,
    evaluator: &RouteEvaluator<'_>,
    sites: &[Site],
    critical: &[usize],
    max_attempts: usize,
) -> bool {
    let instance = evaluator.instance();
    let members: Vec<usize> = critical
        .iter()
        .copied()
        .filter(|&r| r < solution.num_routes() && !solution.route(r).is_empty())
        .collect();
    if members.len() < 2 {
        return false;
    }

    let routes: Vec<KernelRoute> = members
        .iter()
        .map(|&r| {
            let route = solution.route(r);
            KernelRoute {
                stops: route
                    .customer_ids()
                    .iter()
                    .map(|&id| instance.position(id).map_or(usize::MAX, |p| p + 1))
                    .collect(),
                departure: route.departure_time(),
            }
        })
        .collect();

    let Some(found) = find_tail_exchange(sites, solution.capacity(), &routes, max_attempts) else {
        return false;
    };

    let (ia, ib) = (members[found.a], members[found.b]);
    let (ra, rb) = (solution.route(ia), solution.route(ib));
    let (ids_a, ids_b) = (ra.customer_ids(), rb.customer_ids());
    let (departure_a, eval_a) =
        evaluator.evaluate_best(candidates::spliced(&ids_a[..found.cut_a], &ids_b[found.cut_b..]), 0.0);
    let (departure_b, eval_b) =
        evaluator.evaluate_best(candidates::spliced(&ids_b[..found.cut_b], &ids_a[found.cut_a..]), 0.0);
    if judge(Operator::TailExchange, &[&eval_a, &eval_b], ra.cost() + rb.cost()).is_err() {
        return false;
    }

    trace!(
        route_a = ia,
        route_b = ib,
        cut_a = found.cut_a,
        cut_b = found.cut_b,
        attempts = found.attempts,
        "tail exchange"
    );
    let (a, b) = solution.pair_mut(ia, ib);
    let tail_a = a.detach_tail(found.cut_a);
    let tail_b = b.detach_tail(found.cut_b);
    a.attach_tail(tail_b, departure_a, &eval_a);
    b.attach_tail(tail_a, departure_b, &eval_b);
    true
}
