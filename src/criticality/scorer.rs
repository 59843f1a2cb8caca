//! Criticality scoring.
//!
//! # Score
//!
//! ```text
//! score = w_density · density / max_density
//!       + w_waiting · min(waiting / waiting_scale, 1)
//!       + w_tight   · min(tight_stops / tight_count_scale, 1)
//!       + w_slack   · max(0, 1 − avg_slack / slack_scale)
//! ```
//!
//! `density` is route cost per stop, normalized by the densest route of the
//! solution. A stop is tight when its slack (`due − service_start`) is below
//! `tight_slack`. Every term lies in `[0, 1]`, so the score is bounded by
//! the sum of the weights.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evaluation::RouteEvaluator;
use crate::models::{Instance, Route, Solution};

/// Weights and normalization constants of the criticality score.
///
/// The defaults are tuning constants, not correctness requirements; only
/// the ranking's total order matters to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalityWeights {
    /// Weight of normalized cost per stop.
    pub cost_density: f64,
    /// Weight of total waiting time.
    pub waiting: f64,
    /// Weight of the number of tight stops.
    pub tight_windows: f64,
    /// Weight of (inverted) average slack.
    pub slack: f64,
    /// Slack below which a stop counts as tight.
    pub tight_slack: f64,
    /// Waiting time that saturates the waiting term.
    pub waiting_scale: f64,
    /// Tight-stop count that saturates the tight term.
    pub tight_count_scale: f64,
    /// Average slack at which the slack term reaches zero.
    pub slack_scale: f64,
}

impl Default for CriticalityWeights {
    fn default() -> Self {
        Self {
            cost_density: 0.4,
            waiting: 0.2,
            tight_windows: 0.2,
            slack: 0.2,
            tight_slack: 10.0,
            waiting_scale: 100.0,
            tight_count_scale: 10.0,
            slack_scale: 50.0,
        }
    }
}

impl CriticalityWeights {
    /// Checks that weights are finite and non-negative and scales positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [self.cost_density, self.waiting, self.tight_windows, self.slack, self.tight_slack];
        let scales = [self.waiting_scale, self.tight_count_scale, self.slack_scale];
        let ok = weights.iter().all(|w| w.is_finite() && *w >= 0.0)
            && scales.iter().all(|s| s.is_finite() && *s > 0.0);
        if ok {
            Ok(())
        } else {
            Err(ConfigError::CriticalityWeights)
        }
    }
}

/// Raw per-route measurements feeding the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteProfile {
    /// Cost per stop.
    pub density: f64,
    /// Total waiting time.
    pub waiting: f64,
    /// Stops whose slack is below the tight threshold.
    pub tight_stops: usize,
    /// Average slack per stop.
    pub average_slack: f64,
}

/// Ranks the routes of a solution by how much they are worth improving.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance};
/// use mihmds::constructive::InsertionBuilder;
/// use mihmds::criticality::CriticalityScorer;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = vec![
///     Customer::new(1, 10.0, 0.0, 30, 0.0),
///     Customer::new(2, 50.0, 0.0, 30, 0.0),
/// ];
/// let instance = Instance::new(depot, customers, 40).unwrap();
/// let solution = InsertionBuilder::new(&instance)
///     .build(&mut StdRng::seed_from_u64(0))
///     .unwrap();
///
/// let ranked = CriticalityScorer::new(&instance).rank(&solution, 5);
/// assert_eq!(ranked.len(), 2);
/// // the far customer's route is costlier per stop
/// assert_eq!(solution.route(ranked[0]).customer_ids(), &[2]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CriticalityScorer<'a> {
    evaluator: RouteEvaluator<'a>,
    weights: CriticalityWeights,
}

impl<'a> CriticalityScorer<'a> {
    /// Creates a scorer with default weights.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            evaluator: RouteEvaluator::new(instance),
            weights: CriticalityWeights::default(),
        }
    }

    /// Replaces the weights.
    pub fn with_weights(mut self, weights: CriticalityWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Measures one route at its own departure time.
    pub fn profile(&self, route: &Route) -> RouteProfile {
        let mut tight_stops = 0;
        let tight_slack = self.weights.tight_slack;
        let eval = self.evaluator.inspect(
            route.customer_ids().iter().copied(),
            route.departure_time(),
            |stop| {
                if stop.slack < tight_slack {
                    tight_stops += 1;
                }
            },
        );
        RouteProfile {
            density: if eval.stops == 0 { 0.0 } else { eval.cost / eval.stops as f64 },
            waiting: eval.waiting,
            tight_stops,
            average_slack: eval.average_slack(),
        }
    }

    /// Scores every non-empty route, in route order.
    pub fn scores(&self, solution: &Solution) -> Vec<(usize, f64)> {
        let profiles: Vec<(usize, RouteProfile)> = solution
            .routes()
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_empty())
            .map(|(i, r)| (i, self.profile(r)))
            .collect();

        let max_density = profiles
            .iter()
            .map(|(_, p)| p.density)
            .filter(|d| d.is_finite())
            .fold(0.0_f64, f64::max);

        let w = &self.weights;
        profiles
            .into_iter()
            .map(|(i, p)| {
                let density = if max_density > 0.0 {
                    (p.density / max_density).min(1.0)
                } else {
                    0.0
                };
                let waiting = (p.waiting / w.waiting_scale).min(1.0);
                let tight = (p.tight_stops as f64 / w.tight_count_scale).min(1.0);
                let slack = (1.0 - p.average_slack / w.slack_scale).max(0.0);
                let score = w.cost_density * density + w.waiting * waiting + w.tight_windows * tight + w.slack * slack;
                (i, score)
            })
            .collect()
    }

    /// Indices of the `top_n` most critical non-empty routes, most critical
    /// first.
    ///
    /// Ties (and NaN-free equal scores) are broken by ascending route index,
    /// so the order is total and reproducible. Routes are never copied.
    pub fn rank(&self, solution: &Solution, top_n: usize) -> Vec<usize> {
        let mut scored = self.scores(solution);
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.into_iter().take(top_n).map(|(i, _)| i).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Customer;

    fn instance() -> Instance {
        let depot = Customer::depot(0.0, 0.0, 1000.0);
        let customers = vec![
            Customer::new(1, 10.0, 0.0, 1, 0.0),
            Customer::new(2, 0.0, 10.0, 1, 0.0),
            Customer::new(3, 40.0, 0.0, 1, 0.0),
            Customer::new(4, 0.0, 5.0, 1, 0.0).with_time_window(30.0, 35.0),
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
    fn test_profile_measures_waiting_and_tight() {
        let inst = instance();
        let sol = solution(&inst, &[&[4]]);
        let p = CriticalityScorer::new(&inst).profile(sol.route(0));
        // arrive 5, wait 25, start 30, slack 5
        assert!((p.waiting - 25.0).abs() < 1e-10);
        assert_eq!(p.tight_stops, 1);
        assert!((p.average_slack - 5.0).abs() < 1e-10);
        assert!((p.density - 35.0).abs() < 1e-10);
    }

    #[test]
    fn test_rank_is_descending_and_truncated() {
        let inst = instance();
        let sol = solution(&inst, &[&[1], &[3], &[4]]);
        let scorer = CriticalityScorer::new(&inst);
        let scores = scorer.scores(&sol);
        let ranked = scorer.rank(&sol, 2);
        assert_eq!(ranked.len(), 2);
        let score_of = |i: usize| scores.iter().find(|(j, _)| *j == i).map(|s| s.1).expect("scored");
        assert!(score_of(ranked[0]) >= score_of(ranked[1]));
        // route 0 (near, no waiting, loose) is the least critical
        assert!(!ranked.contains(&0));
    }

    #[test]
    fn test_ties_break_by_index() {
        let inst = instance();
        // 1 and 2 are mirror images: identical scores
        let sol = solution(&inst, &[&[2], &[1]]);
        let ranked = CriticalityScorer::new(&inst).rank(&sol, 5);
        assert_eq!(ranked, vec![0, 1]);
    }

    #[test]
    fn test_empty_routes_are_skipped() {
        let inst = instance();
        let sol = solution(&inst, &[&[], &[1]]);
        let ranked = CriticalityScorer::new(&inst).rank(&sol, 5);
        assert_eq!(ranked, vec![1]);
    }

    #[test]
    fn test_weights_validation() {
        assert!(CriticalityWeights::default().validate().is_ok());
        let bad = CriticalityWeights {
            waiting: -1.0,
            ..CriticalityWeights::default()
        };
        assert_eq!(bad.validate(), Err(ConfigError::CriticalityWeights));
        let zero_scale = CriticalityWeights {
            slack_scale: 0.0,
            ..CriticalityWeights::default()
        };
        assert!(zero_scale.validate().is_err());
    }
}
