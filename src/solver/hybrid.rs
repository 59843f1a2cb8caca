//! Hybrid construction-and-improvement solver.
//!
//! # Algorithm
//!
//! ```text
//! INIT → BUILD → IMPROVE(round 1..K) → DONE
//! ```
//!
//! BUILD runs the limited-candidate insertion builder once; an unsatisfiable
//! customer ends the solve with an error. Each IMPROVE round ranks the
//! routes, takes the `top_n_critical` most critical, and for each of them
//! applies temporal shift, swap, and relocate in priority order, restarting
//! from the first operator whenever one commits (up to `max_route_passes`
//! times). A tail-exchange search over the critical set follows, then one
//! 2-opt and one or-opt attempt per critical route and a route-merge
//! search from the critical routes into any other route. Emptied routes
//! are dropped at the end of the round.
//!
//! The loop stops after `max_rounds`, after a round that accepts no move,
//! or, checked only between rounds, when the time limit has passed. Every
//! accepted move lowers the total cost, so the cost is non-increasing
//! across rounds.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constructive::InsertionBuilder;
use crate::criticality::CriticalityScorer;
use crate::error::SolveError;
use crate::evaluation::RouteEvaluator;
use crate::local_search::{
    or_opt, relocate, route_merge, swap, tail_exchange, temporal_shift, two_opt, Operator,
};
use crate::models::{Customer, Instance, Site, Solution};

use super::{MoveCounts, SolveStats, SolverConfig, Termination};

/// Solver state machine phases, traced at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Configuration checked, nothing built yet.
    Init,
    /// Constructing the initial solution.
    Build,
    /// Improvement round in progress (1-based).
    Improve(usize),
    /// Terminal.
    Done,
}

/// A complete, feasible solution and how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    /// The final solution.
    pub solution: Solution,
    /// Solve statistics.
    pub stats: SolveStats,
}

/// Runs construction followed by targeted local search.
///
/// # Examples
///
/// ```
/// use mihmds::models::{Customer, Instance};
/// use mihmds::solver::{HybridSolver, SolverConfig};
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = vec![
///     Customer::new(1, 10.0, 0.0, 10, 5.0),
///     Customer::new(2, 10.0, 10.0, 10, 5.0),
///     Customer::new(3, 0.0, 10.0, 10, 5.0),
/// ];
/// let instance = Instance::new(depot, customers, 30).unwrap();
///
/// let outcome = HybridSolver::new(SolverConfig::default()).solve(&instance).unwrap();
/// assert!(outcome.solution.verify(&instance).is_empty());
/// assert!(outcome.stats.final_cost <= outcome.stats.initial_cost);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HybridSolver {
    config: SolverConfig,
}

/// Read-only context shared by every step of one solve.
struct Context<'a> {
    evaluator: RouteEvaluator<'a>,
    scorer: CriticalityScorer<'a>,
    sites: Vec<Site>,
}

impl HybridSolver {
    /// Creates a solver.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `instance`.
    ///
    /// Returns [`SolveError::Configuration`] if a tunable is out of range
    /// (checked before any work) and [`SolveError::InvalidInstance`] if some
    /// customer cannot be served. No partial solution is ever returned.
    pub fn solve(&self, instance: &Instance) -> Result<SolveOutcome, SolveError> {
        let config = &self.config;
        let mut phase = Phase::Init;
        config.validate()?;
        let start = Instant::now();

        enter(&mut phase, Phase::Build);
        let mut rng = StdRng::seed_from_u64(config.random_seed);
        let mut solution = InsertionBuilder::new(instance)
            .with_candidate_ratio(config.candidate_ratio)
            .with_min_candidates(config.min_candidates)
            .with_order(config.insertion_order)
            .build(&mut rng)?;
        let build_time = start.elapsed();
        let initial_cost = solution.total_cost();
        let initial_vehicles = solution.num_vehicles();
        info!(
            customers = instance.num_customers(),
            vehicles = initial_vehicles,
            cost = initial_cost,
            elapsed_ms = build_time.as_millis() as u64,
            "construction complete"
        );

        let ctx = Context {
            evaluator: RouteEvaluator::new(instance),
            scorer: CriticalityScorer::new(instance).with_weights(config.criticality),
            sites: instance.site_table(),
        };
        let mut moves = MoveCounts::default();
        let mut cost_history = Vec::new();
        let mut rounds = 0;

        let termination = loop {
            if rounds >= config.max_rounds {
                break Termination::MaxRounds;
            }
            if config.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                break Termination::TimeLimit;
            }
            rounds += 1;
            enter(&mut phase, Phase::Improve(rounds));

            let accepted = self.improve_round(&ctx, &mut solution, &mut moves);
            let dropped = solution.compact();
            cost_history.push(solution.total_cost());
            debug!(
                round = rounds,
                accepted,
                dropped,
                vehicles = solution.num_vehicles(),
                cost = solution.total_cost(),
                "round complete"
            );
            if accepted == 0 {
                break Termination::FixedPoint;
            }
        };

        enter(&mut phase, Phase::Done);
        let total_time = start.elapsed();
        let stats = SolveStats {
            rounds,
            moves,
            initial_cost,
            initial_vehicles,
            final_cost: solution.total_cost(),
            final_vehicles: solution.num_vehicles(),
            cost_history,
            build_time,
            improve_time: total_time.saturating_sub(build_time),
            total_time,
            termination,
        };
        info!(
            rounds,
            ?termination,
            vehicles = stats.final_vehicles,
            cost = stats.final_cost,
            improvement_pct = stats.improvement_pct(),
            elapsed_ms = total_time.as_millis() as u64,
            "solve complete"
        );

        Ok(SolveOutcome { solution, stats })
    }

    /// One IMPROVE round; returns the number of accepted moves.
    fn improve_round(&self, ctx: &Context<'_>, solution: &mut Solution, moves: &mut MoveCounts) -> usize {
        let config = &self.config;
        let critical = ctx.scorer.rank(solution, config.top_n_critical);
        let mut accepted = 0;

        for &index in &critical {
            for _ in 0..config.max_route_passes {
                let Some(op) = self.improve_route(ctx, solution, index, &critical) else {
                    break;
                };
                moves.record(op);
                accepted += 1;
            }
        }

        if tail_exchange(
            solution,
            &ctx.evaluator,
            &ctx.sites,
            &critical,
            config.max_tail_exchange_attempts,
        ) {
            moves.record(Operator::TailExchange);
            accepted += 1;
        }

        for &index in &critical {
            if two_opt(solution, &ctx.evaluator, index, config.max_two_opt_attempts) {
                moves.record(Operator::TwoOpt);
                accepted += 1;
            }
            if or_opt(solution, &ctx.evaluator, index, config.max_or_opt_attempts) {
                moves.record(Operator::OrOpt);
                accepted += 1;
            }
        }

        if route_merge(solution, &ctx.evaluator, &critical, config.max_merge_attempts) {
            moves.record(Operator::RouteMerge);
            accepted += 1;
        }
        accepted
    }

    /// Applies the route operators in priority order and reports the first
    /// one that commits.
    fn improve_route(&self, ctx: &Context<'_>, solution: &mut Solution, index: usize, critical: &[usize]) -> Option<Operator> {
        let config = &self.config;
        let ev = &ctx.evaluator;
        if solution.route(index).is_empty() {
            None
        } else if temporal_shift(solution, ev, index) {
            Some(Operator::TemporalShift)
        } else if swap(solution, ev, index, config.max_swap_attempts) {
            Some(Operator::Swap)
        } else if relocate(solution, ev, index, critical, config.max_relocate_attempts) {
            Some(Operator::Relocate)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Init => f.write_str("init"),
            Phase::Build => f.write_str("build"),
            Phase::Improve(round) => write!(f, "improve({round})"),
            Phase::Done => f.write_str("done"),
        }
    }
}

fn enter(phase: &mut Phase, next: Phase) {
    debug!(from = %phase, to = %next, "phase");
    *phase = next;
}

/// Solves one instance given as raw records.
///
/// Builds the [`Instance`] (rejecting duplicate customer ids) and runs a
/// [`HybridSolver`] with `config`.
///
/// # Examples
///
/// ```
/// use mihmds::models::Customer;
/// use mihmds::solver::{solve, SolverConfig};
///
/// let depot = Customer::depot(0.0, 0.0, 1000.0);
/// let customers = vec![Customer::new(1, 3.0, 4.0, 10, 0.0)];
/// let outcome = solve(depot, customers, 50, &SolverConfig::default()).unwrap();
/// assert_eq!(outcome.solution.num_vehicles(), 1);
/// assert!((outcome.solution.total_cost() - 10.0).abs() < 1e-10);
/// ```
pub fn solve(
    depot: Customer,
    customers: Vec<Customer>,
    capacity: u32,
    config: &SolverConfig,
) -> Result<SolveOutcome, SolveError> {
    let instance = Instance::new(depot, customers, capacity)?;
    HybridSolver::new(config.clone()).solve(&instance)
}
