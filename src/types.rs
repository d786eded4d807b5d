//! Core type definitions: objective signature, solver options, and results.

use std::fmt;

use crate::error::RetireReason;
use crate::hyperrect::HyperRect;
use crate::interval::Interval;

// ──────────────────────────────────────────────────────────────────────────────
// Type Aliases
// ──────────────────────────────────────────────────────────────────────────────

/// Interval objective.
///
/// Maps a box to an enclosure of the objective's range over that box. The
/// caller guarantees the enclosure is sound (contains every true value) and
/// inclusion-isotone (a sub-box never gets a wider enclosure). Neither
/// property is checked.
pub type ObjectiveFn = dyn Fn(&HyperRect) -> Interval + Send + Sync;

// ──────────────────────────────────────────────────────────────────────────────
// Options
// ──────────────────────────────────────────────────────────────────────────────

/// Configuration options for the branch-and-bound solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverOptions {
    /// Boxes whose diameter is at most this value are never subdivided.
    pub x_tol: f64,

    /// Boxes whose objective enclosure is at most this wide are never subdivided.
    pub f_tol: f64,

    /// Subdivision budget. Once the number of subdivisions exceeds this value,
    /// every remaining box is retired as-is.
    pub max_iter: usize,

    /// Evaluate box enclosures and midpoint probes on the rayon thread pool.
    /// Decisions are still applied in FIFO order, so results are identical to
    /// the serial path.
    pub parallel: bool,

    /// Minimum batch size for the parallel path. Smaller queue generations are
    /// evaluated serially even when `parallel` is `true`.
    /// Default: 4.
    pub min_parallel_evals: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            x_tol: 1e-6,
            f_tol: 1e-6,
            max_iter: 10_000,
            parallel: false,
            min_parallel_evals: 4,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Result
// ──────────────────────────────────────────────────────────────────────────────

/// Number of boxes retired for each reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetireCounts {
    pub dominated: usize,
    pub small_box: usize,
    pub tight_bound: usize,
    pub budget: usize,
}

impl RetireCounts {
    pub fn record(&mut self, reason: RetireReason) {
        match reason {
            RetireReason::Dominated => self.dominated += 1,
            RetireReason::SmallBox => self.small_box += 1,
            RetireReason::TightBound => self.tight_bound += 1,
            RetireReason::Budget => self.budget += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.dominated + self.small_box + self.tight_bound + self.budget
    }
}

/// Result of a branch-and-bound run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveResult {
    /// Proven upper bound on the global maximum.
    #[cfg_attr(feature = "serde", serde(with = "extended_float"))]
    pub max_upper: f64,

    /// Best lower bound obtained from midpoint probes. Stays `-inf` when the
    /// first box is retired without a split.
    #[cfg_attr(feature = "serde", serde(with = "extended_float"))]
    pub best_lower: f64,

    /// Number of subdivisions performed.
    pub nit: usize,

    /// Number of boxes taken off the queue.
    pub nbox: usize,

    /// Total objective evaluations (box enclosures plus midpoint probes).
    pub nfev: usize,

    /// Retirement tally.
    pub retired: RetireCounts,
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SolveResult {{")?;
        writeln!(f, "  max_upper: {:.15e}", self.max_upper)?;
        writeln!(f, "  best_lower: {:.15e}", self.best_lower)?;
        writeln!(f, "  nit: {}", self.nit)?;
        writeln!(f, "  nbox: {}", self.nbox)?;
        writeln!(f, "  nfev: {}", self.nfev)?;
        writeln!(
            f,
            "  retired: dominated={} small_box={} tight_bound={} budget={}",
            self.retired.dominated,
            self.retired.small_box,
            self.retired.tight_bound,
            self.retired.budget
        )?;
        write!(f, "}}")
    }
}

/// Serde adapter for bounds that may be infinite or NaN.
///
/// Finite values are written as numbers. Other values are written as the
/// strings `"inf"`, `"-inf"` and `"NaN"`, since formats like JSON have no
/// literal for them.
#[cfg(feature = "serde")]
mod extended_float {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => text
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid bound {:?}", text))),
        }
    }
}
