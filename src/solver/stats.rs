//! Solve statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::local_search::Operator;

/// Why the improvement loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A full round accepted no move.
    FixedPoint,
    /// The round limit was reached.
    MaxRounds,
    /// The wall-clock budget ran out.
    TimeLimit,
}

/// Accepted moves per operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCounts {
    /// Temporal shifts.
    pub temporal_shift: usize,
    /// Intra-route swaps.
    pub swap: usize,
    /// Relocations.
    pub relocate: usize,
    /// Tail exchanges.
    pub tail_exchange: usize,
    /// Segment reversals.
    pub two_opt: usize,
    /// Chain moves.
    pub or_opt: usize,
    /// Route merges.
    pub route_merge: usize,
}

impl MoveCounts {
    /// Records one accepted move.
    pub fn record(&mut self, op: Operator) {
        match op {
            Operator::TemporalShift => self.temporal_shift += 1,
            Operator::Swap => self.swap += 1,
            Operator::Relocate => self.relocate += 1,
            Operator::TailExchange => self.tail_exchange += 1,
            Operator::TwoOpt => self.two_opt += 1,
            Operator::OrOpt => self.or_opt += 1,
            Operator::RouteMerge => self.route_merge += 1,
        }
    }

    /// Count for one operator.
    pub fn get(&self, op: Operator) -> usize {
        match op {
            Operator::TemporalShift => self.temporal_shift,
            Operator::Swap => self.swap,
            Operator::Relocate => self.relocate,
            Operator::TailExchange => self.tail_exchange,
            Operator::TwoOpt => self.two_opt,
            Operator::OrOpt => self.or_opt,
            Operator::RouteMerge => self.route_merge,
        }
    }

    /// Total accepted moves.
    pub fn total(&self) -> usize {
        Operator::ALL.iter().map(|&op| self.get(op)).sum()
    }
}

/// Statistics of one solve.
///
/// Reported to the caller; the solver never reads them for control flow
/// beyond its termination conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Improvement rounds executed.
    pub rounds: usize,
    /// Accepted moves per operator.
    pub moves: MoveCounts,
    /// Total cost after construction.
    pub initial_cost: f64,
    /// Vehicles after construction.
    pub initial_vehicles: usize,
    /// Total cost of the returned solution.
    pub final_cost: f64,
    /// Vehicles of the returned solution.
    pub final_vehicles: usize,
    /// Total cost after each round.
    pub cost_history: Vec<f64>,
    /// Time spent constructing.
    pub build_time: Duration,
    /// Time spent improving.
    pub improve_time: Duration,
    /// End-to-end time.
    pub total_time: Duration,
    /// Why improvement stopped.
    pub termination: Termination,
}

impl SolveStats {
    /// Relative cost reduction from construction to the final solution, in
    /// percent.
    pub fn improvement_pct(&self) -> f64 {
        if self.initial_cost > 0.0 {
            (self.initial_cost - self.final_cost) / self.initial_cost * 100.0
        } else {
            0.0
        }
    }
}
