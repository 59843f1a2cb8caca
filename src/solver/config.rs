//! Solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constructive::InsertionOrder;
use crate::criticality::CriticalityWeights;
use crate::error::ConfigError;

/// Tunables of the hybrid solver.
///
/// # Examples
///
/// ```
/// use mihmds::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_candidate_ratio(0.5)
///     .with_top_n_critical(3)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
///
/// let bad = SolverConfig::default().with_candidate_ratio(0.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Fraction of insertion slots sampled per customer, in `(0, 1]`.
    pub candidate_ratio: f64,
    /// Minimum slots sampled per customer (≥ 1).
    pub min_candidates: usize,
    /// Routes improved per round (≥ 1).
    pub top_n_critical: usize,
    /// Maximum improvement rounds; zero skips improvement.
    pub max_rounds: usize,
    /// Cut pairs evaluated per tail-exchange call.
    pub max_tail_exchange_attempts: usize,
    /// Seed of the insertion sampler.
    pub random_seed: u64,
    /// Swap candidates evaluated per call.
    pub max_swap_attempts: usize,
    /// Relocate candidates evaluated per call and phase.
    pub max_relocate_attempts: usize,
    /// Operator restarts per critical route per round.
    pub max_route_passes: usize,
    /// Reversals evaluated per 2-opt call; zero disables 2-opt.
    pub max_two_opt_attempts: usize,
    /// Chain moves evaluated per or-opt call; zero disables or-opt.
    pub max_or_opt_attempts: usize,
    /// Destinations tried per route-merge call; zero disables merging.
    pub max_merge_attempts: usize,
    /// Customer placement order during construction.
    pub insertion_order: InsertionOrder,
    /// Criticality score weights.
    pub criticality: CriticalityWeights,
    /// Wall-clock budget, checked between rounds.
    pub time_limit: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            candidate_ratio: 0.3,
            min_candidates: 3,
            top_n_critical: 5,
            max_rounds: 50,
            max_tail_exchange_attempts: 150,
            random_seed: 42,
            max_swap_attempts: 50,
            max_relocate_attempts: 50,
            max_route_passes: 4,
            max_two_opt_attempts: 50,
            max_or_opt_attempts: 50,
            max_merge_attempts: 10,
            insertion_order: InsertionOrder::Urgency,
            criticality: CriticalityWeights::default(),
            time_limit: None,
        }
    }
}

impl SolverConfig {
    /// Sets the candidate ratio.
    pub fn with_candidate_ratio(mut self, ratio: f64) -> Self {
        self.candidate_ratio = ratio;
        self
    }

    /// Sets the candidate floor.
    pub fn with_min_candidates(mut self, min: usize) -> Self {
        self.min_candidates = min;
        self
    }

    /// Sets the number of critical routes per round.
    pub fn with_top_n_critical(mut self, n: usize) -> Self {
        self.top_n_critical = n;
        self
    }

    /// Sets the round limit.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Sets the tail-exchange attempt bound.
    pub fn with_max_tail_exchange_attempts(mut self, attempts: usize) -> Self {
        self.max_tail_exchange_attempts = attempts;
        self
    }

    /// Sets the swap attempt bound.
    pub fn with_max_swap_attempts(mut self, attempts: usize) -> Self {
        self.max_swap_attempts = attempts;
        self
    }

    /// Sets the relocate attempt bound.
    pub fn with_max_relocate_attempts(mut self, attempts: usize) -> Self {
        self.max_relocate_attempts = attempts;
        self
    }

    /// Sets the operator restarts per critical route.
    pub fn with_max_route_passes(mut self, passes: usize) -> Self {
        self.max_route_passes = passes;
        self
    }

    /// Sets the 2-opt attempt bound.
    pub fn with_max_two_opt_attempts(mut self, attempts: usize) -> Self {
        self.max_two_opt_attempts = attempts;
        self
    }

    /// Sets the or-opt attempt bound.
    pub fn with_max_or_opt_attempts(mut self, attempts: usize) -> Self {
        self.max_or_opt_attempts = attempts;
        self
    }

    /// Sets the route-merge attempt bound.
    pub fn with_max_merge_attempts(mut self, attempts: usize) -> Self {
        self.max_merge_attempts = attempts;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Sets the placement order.
    pub fn with_insertion_order(mut self, order: InsertionOrder) -> Self {
        self.insertion_order = order;
        self
    }

    /// Sets the criticality weights.
    pub fn with_criticality(mut self, weights: CriticalityWeights) -> Self {
        self.criticality = weights;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Checks every tunable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.candidate_ratio > 0.0 && self.candidate_ratio <= 1.0) {
            return Err(ConfigError::CandidateRatio(self.candidate_ratio));
        }
        if self.min_candidates == 0 {
            return Err(ConfigError::MinCandidates);
        }
        if self.top_n_critical == 0 {
            return Err(ConfigError::TopNCritical);
        }
        self.criticality.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SolverConfig::default();
        assert_eq!(c.candidate_ratio, 0.3);
        assert_eq!(c.min_candidates, 3);
        assert_eq!(c.top_n_critical, 5);
        assert_eq!(c.max_tail_exchange_attempts, 150);
        assert_eq!(c.max_merge_attempts, 10);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_ratio_bounds() {
        let ok = SolverConfig::default().with_candidate_ratio(1.0);
        assert!(ok.validate().is_ok());
        for bad in [0.0, -0.5, 1.01, f64::NAN] {
            let c = SolverConfig::default().with_candidate_ratio(bad);
            assert!(matches!(c.validate(), Err(ConfigError::CandidateRatio(_))), "ratio {bad}");
        }
    }

    #[test]
    fn test_counts_must_be_positive() {
        let c = SolverConfig::default().with_min_candidates(0);
        assert_eq!(c.validate(), Err(ConfigError::MinCandidates));
        let c = SolverConfig::default().with_top_n_critical(0);
        assert_eq!(c.validate(), Err(ConfigError::TopNCritical));
        // zero rounds and zero attempts are legal
        let c = SolverConfig::default()
            .with_max_rounds(0)
            .with_max_tail_exchange_attempts(0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_attempt_setters() {
        let c = SolverConfig::default()
            .with_max_swap_attempts(7)
            .with_max_relocate_attempts(8)
            .with_max_route_passes(2)
            .with_max_two_opt_attempts(0)
            .with_max_or_opt_attempts(3)
            .with_max_merge_attempts(0);
        assert_eq!(
            (c.max_swap_attempts, c.max_relocate_attempts, c.max_route_passes),
            (7, 8, 2)
        );
        assert_eq!(
            (c.max_two_opt_attempts, c.max_or_opt_attempts, c.max_merge_attempts),
            (0, 3, 0)
        );
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SolverConfig = serde_json::from_str(r#"{"random_seed": 9, "insertion_order": "input"}"#)
            .expect("valid json");
        assert_eq!(c.random_seed, 9);
        assert_eq!(c.insertion_order, InsertionOrder::Input);
        assert_eq!(c.top_n_critical, 5);
    }
}
