//! In-place local search operators for VRPTW routes.
//!
//! - [`temporal_shift()`] — delays depot departure to absorb waiting, O(L)
//! - [`swap()`] — intra-route position exchange, first improvement
//! - [`relocate()`] — intra- and inter-route customer move, first improvement
//! - [`tail_exchange()`] — inter-route 2-opt* tail swap, first improvement,
//!   backed by the pure [`find_tail_exchange`] kernel
//! - [`two_opt()`] — intra-route segment reversal, first improvement
//! - [`or_opt()`] — intra-route move of a 2–3 stop chain, first improvement
//! - [`route_merge()`] — folds a whole route into another one
//!
//! Every operator either commits exactly one improving move and returns
//! `true`, or leaves the solution untouched and returns `false`. A move is
//! improving when its new cost beats the old one by more than
//! [`EPSILON`](crate::evaluation::EPSILON). Candidate sequences are priced
//! at their best departure (see [`walk_best`](crate::evaluation::walk_best)).

mod or_opt;
mod relocate;
mod route_merge;
mod swap;
mod tail_exchange;
mod temporal_shift;
mod two_opt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::evaluation::{improves, Evaluation};

pub use or_opt::or_opt;
pub use relocate::relocate;
pub use route_merge::route_merge;
pub use swap::swap;
pub use tail_exchange::{find_tail_exchange, tail_exchange, KernelRoute, TailExchange};
pub use temporal_shift::{temporal_shift, ShiftPlan};
pub use two_opt::two_opt;

/// Local search operator, in application priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Departure-time shift.
    TemporalShift,
    /// Intra-route swap.
    Swap,
    /// Intra/inter-route relocate.
    Relocate,
    /// Inter-route tail exchange (2-opt*).
    TailExchange,
    /// Intra-route segment reversal.
    TwoOpt,
    /// Intra-route chain move.
    OrOpt,
    /// Whole-route merge.
    RouteMerge,
}

impl Operator {
    /// All operators in priority order.
    pub const ALL: [Operator; 7] = [
        Operator::TemporalShift,
        Operator::Swap,
        Operator::Relocate,
        Operator::TailExchange,
        Operator::TwoOpt,
        Operator::OrOpt,
        Operator::RouteMerge,
    ];

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Operator::TemporalShift => "temporal_shift",
            Operator::Swap => "swap",
            Operator::Relocate => "relocate",
            Operator::TailExchange => "tail_exchange",
            Operator::TwoOpt => "two_opt",
            Operator::OrOpt => "or_opt",
            Operator::RouteMerge => "route_merge",
        }
    }
}

/// Why a candidate move was not committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// A candidate route violates capacity or a time window.
    InfeasibleMove,
    /// Feasible, but not better by more than epsilon.
    NotImproving,
}

/// Acceptance test shared by all operators.
///
/// `candidates` are the evaluations of every route the move rewrites;
/// `old_cost` is the combined cost of those routes before the move.
pub(crate) fn judge(op: Operator, candidates: &[&Evaluation], old_cost: f64) -> Result<f64, Rejection> {
    let rejection = if candidates.iter().any(|e| !e.feasible) {
        Rejection::InfeasibleMove
    } else {
        let new_cost: f64 = candidates.iter().map(|e| e.cost).sum();
        if improves(new_cost, old_cost) {
            return Ok(new_cost);
        }
        Rejection::NotImproving
    };
    trace!(operator = op.name(), ?rejection, "rejected");
    Err(rejection)
}
