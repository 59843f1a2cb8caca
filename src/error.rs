//! Error types.

use thiserror::Error;

/// A solve that could not produce a complete, feasible solution.
///
/// No partial solution accompanies an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The instance itself cannot be served: some customer has no feasible
    /// single-vehicle route, or the catalog is malformed.
    #[error("invalid instance: customer {customer_id}: {reason}")]
    InvalidInstance {
        /// Offending customer.
        customer_id: usize,
        /// Why the customer cannot be served.
        reason: InvalidReason,
    },
    /// A tunable is out of range.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Why a customer makes the instance unsolvable.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidReason {
    /// `ready_time > due_date` or a non-finite bound.
    #[error("malformed time window [{ready}, {due}]")]
    MalformedWindow {
        /// Window opening.
        ready: f64,
        /// Window closing.
        due: f64,
    },
    /// Demand alone exceeds vehicle capacity.
    #[error("demand {demand} exceeds vehicle capacity {capacity}")]
    DemandExceedsCapacity {
        /// Customer demand.
        demand: u32,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// Even a direct trip from the depot arrives after the due date.
    #[error("unreachable before due date {due} (earliest arrival {earliest_arrival})")]
    UnreachableWindow {
        /// Earliest possible arrival.
        earliest_arrival: f64,
        /// Window closing.
        due: f64,
    },
    /// The id appears more than once in the catalog.
    #[error("duplicate customer id")]
    DuplicateId,
}

/// An out-of-range solver tunable.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// `candidate_ratio` must lie in `(0, 1]`.
    #[error("candidate_ratio must be in (0, 1], got {0}")]
    CandidateRatio(f64),
    /// `min_candidates` must be at least 1.
    #[error("min_candidates must be >= 1")]
    MinCandidates,
    /// `top_n_critical` must be at least 1.
    #[error("top_n_critical must be >= 1")]
    TopNCritical,
    /// Criticality weights must be finite and non-negative.
    #[error("criticality weights must be finite and non-negative")]
    CriticalityWeights,
}

/// Failure to read a benchmark instance.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read instance file")]
    Io(#[from] std::io::Error),
    /// A required section header was not found.
    #[error("missing {0} section")]
    MissingSection(&'static str),
    /// A field could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// The parsed records do not form a valid instance.
    #[error(transparent)]
    Instance(#[from] SolveError),
}
