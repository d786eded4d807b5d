//! # interval-globopt: Certified Global Maximization by Interval Branch-and-Bound
//!
//! Computes a rigorous upper bound on the global maximum of a function over a
//! box, given an interval extension of that function: a capability that maps
//! any sub-box to an interval guaranteed to contain the function's range there.
//!
//! ## Overview
//!
//! The solver keeps a FIFO work queue of boxes. Each box is bounded by the
//! objective, then either retired (its upper bound folded into the answer) or
//! bisected along its widest side with both halves queued again. Retirement
//! happens when the box is dominated by a probed lower bound, is narrower than
//! `x_tol`, has an enclosure narrower than `f_tol`, or the subdivision budget
//! `max_iter` is exhausted. Since every part of the domain ends up in some
//! retired box, the returned bound is never below the true maximum as long as
//! the objective's enclosures are sound.
//!
//! ## Example
//!
//! ```
//! use interval_globopt::{solve, HyperRect, Interval};
//!
//! // f(x) = -(x - 3)^2 + 10 has its maximum 10 at x = 3.
//! let domain = HyperRect::from_bounds(&[(0.0, 10.0)]).unwrap();
//! let bound = solve(&domain, 1e-8, 1e-8, 100_000, |x: &HyperRect| {
//!     -(x.side(0) - 3.0).sqr() + 10.0
//! })
//! .unwrap();
//! assert!(bound >= 10.0 && bound < 10.0 + 1e-6);
//! ```
//!
//! ## Features
//!
//! - `trace`: record per-box events into a [`trace::TraceWriter`].
//! - `serde`: `Serialize`/`Deserialize` for options, results, and boxes.

pub mod error;
pub mod ffi;
pub mod hyperrect;
pub mod interval;
pub mod solver;
pub mod trace;
pub mod types;

// Re-export main types
pub use error::{Result, RetireReason, SolverError};
pub use hyperrect::HyperRect;
pub use interval::Interval;
pub use solver::{solve, Solver};
pub use types::{ObjectiveFn, RetireCounts, SolveResult, SolverOptions};
