//! Route evaluation: the single source of truth for cost and feasibility.
//!
//! - [`RouteEvaluator`] — evaluates customer-id sequences against an instance
//! - [`walk`] — the primitive schedule walk every evaluation goes through
//! - [`walk_best`] — the same walk at the departure that absorbs the most waiting
//! - [`candidates`] — zero-copy iterators describing post-move sequences

pub mod candidates;
mod evaluator;

pub use evaluator::{walk, walk_best, Evaluation, RouteEvaluator, Stop, Visit, SHIFT_MARGIN};

/// Minimum cost decrease for a move to count as an improvement.
///
/// Guards acceptance tests against floating-point noise so that local
/// search cannot oscillate between equal-cost states.
pub const EPSILON: f64 = 1e-6;

/// Returns `true` if `new_cost` improves on `old_cost` by more than [`EPSILON`].
#[inline]
pub fn improves(new_cost: f64, old_cost: f64) -> bool {
    new_cost + EPSILON < old_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improves_requires_margin() {
        assert!(improves(10.0, 10.1));
        assert!(!improves(10.0, 10.0));
        assert!(!improves(10.0, 10.0 + 1e-7));
        assert!(!improves(f64::INFINITY, 10.0));
    }
}
