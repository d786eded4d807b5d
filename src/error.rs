//! Error types for the interval branch-and-bound solver.
//!
//! Input validation fails fast with a [`SolverError`]; [`RetireReason`] records
//! why an individual box stopped being refined.

use thiserror::Error;

/// Why a box was retired instead of subdivided.
///
/// Discriminants follow the order in which the solver tests the criteria;
/// when several hold, the first one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetireReason {
    /// Upper bound below the best probed lower bound.
    Dominated = 1,
    /// Box diameter at or below `x_tol`.
    SmallBox = 2,
    /// Objective bound width at or below `f_tol`.
    TightBound = 3,
    /// Subdivision budget exhausted.
    Budget = 4,
}

impl RetireReason {
    /// Short lowercase tag used in trace output.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Dominated => "dominated",
            Self::SmallBox => "small_box",
            Self::TightBound => "tight_bound",
            Self::Budget => "budget",
        }
    }
}

/// Errors reported before or during a solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Initial box must have at least one dimension")]
    EmptyBox,

    #[error("Invalid interval in dimension {dim}: bounds must be finite with lower <= upper")]
    InvalidInterval { dim: usize },

    #[error("Invalid tolerance {name} = {value}: must be non-negative")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("Objective evaluation failed with code {0}")]
    EvaluationFailed(i32),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
}

impl SolverError {
    /// Negative status code used by the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            Self::EmptyBox => -1,
            Self::InvalidInterval { .. } => -2,
            Self::InvalidTolerance { .. } => -3,
            Self::EvaluationFailed(_) => -5,
            Self::InvalidArgs(_) => -101,
        }
    }
}

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;
