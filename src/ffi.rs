//! C FFI bindings for the interval branch-and-bound solver.
//!
//! Lets C and C++ drivers call the solver with an objective implemented on
//! their side. The objective receives the box as two arrays of lower and upper
//! bounds and writes the enclosure of its range through two out-pointers.
//!
//! ```c
//! typedef int (*globopt_interval_func)(int n, const double *lower,
//!                                      const double *upper,
//!                                      double *out_lower, double *out_upper,
//!                                      void *data);
//!
//! int globopt_serial_solver(globopt_interval_func f, void *f_data,
//!                           int dimension, const double *lower,
//!                           const double *upper, double x_tol,
//!                           double f_tol, int max_iter, double *out_max);
//! ```
//!
//! A callback returning non-zero marks that evaluation as failed. The box is
//! then bounded by the whole real line, which keeps the run sound, and the
//! call reports [`SolverError::EvaluationFailed`] once the queue is drained.

use std::os::raw::{c_double, c_int, c_void};
use std::slice;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use crate::error::SolverError;
use crate::hyperrect::HyperRect;
use crate::interval::Interval;
use crate::solver::Solver;
use crate::types::{SolveResult, SolverOptions};

// ──────────────────────────────────────────────────────────────────────────────
// C-compatible types
// ──────────────────────────────────────────────────────────────────────────────

/// C-compatible interval objective.
pub type GloboptIntervalFuncC = unsafe extern "C" fn(
    n: c_int,
    lower: *const c_double,
    upper: *const c_double,
    out_lower: *mut c_double,
    out_upper: *mut c_double,
    data: *mut c_void,
) -> c_int;

/// Status code for a successful run.
pub const GLOBOPT_SUCCESS: c_int = 0;

/// C-compatible result struct for `globopt_serial_solver_full`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GloboptResultC {
    /// `GLOBOPT_SUCCESS` or a negative error code
    pub status: c_int,
    /// Proven upper bound on the maximum
    pub max_upper: c_double,
    /// Best probed lower bound
    pub best_lower: c_double,
    /// Number of subdivisions
    pub nit: c_int,
    /// Number of boxes processed
    pub nbox: c_int,
    /// Number of objective evaluations
    pub nfev: c_int,
}

impl GloboptResultC {
    fn error(status: c_int) -> Self {
        Self {
            status,
            max_upper: f64::NAN,
            best_lower: f64::NAN,
            nit: 0,
            nbox: 0,
            nfev: 0,
        }
    }

    fn from_result(r: &SolveResult) -> Self {
        Self {
            status: GLOBOPT_SUCCESS,
            max_upper: r.max_upper,
            best_lower: r.best_lower,
            nit: clamp_count(r.nit),
            nbox: clamp_count(r.nbox),
            nfev: clamp_count(r.nfev),
        }
    }
}

fn clamp_count(n: usize) -> c_int {
    c_int::try_from(n).unwrap_or(c_int::MAX)
}

// ──────────────────────────────────────────────────────────────────────────────
// Shared driver
// ──────────────────────────────────────────────────────────────────────────────

/// Build and run a serial solver from raw C arguments.
///
/// # Safety
///
/// Same requirements as [`globopt_serial_solver`].
unsafe fn run_from_c(
    f: GloboptIntervalFuncC,
    f_data: *mut c_void,
    dimension: c_int,
    lower: *const c_double,
    upper: *const c_double,
    x_tol: c_double,
    f_tol: c_double,
    max_iter: c_int,
) -> Result<SolveResult, SolverError> {
    if dimension < 1 {
        return Err(SolverError::EmptyBox);
    }
    if lower.is_null() || upper.is_null() {
        return Err(SolverError::InvalidArgs("null bounds pointer".into()));
    }
    if max_iter < 0 {
        return Err(SolverError::InvalidArgs(format!("max_iter = {} is negative", max_iter)));
    }
    let n = dimension as usize;

    let lb = slice::from_raw_parts(lower, n);
    let ub = slice::from_raw_parts(upper, n);
    let bounds: Vec<(f64, f64)> = lb.iter().zip(ub.iter()).map(|(&l, &u)| (l, u)).collect();
    let initial = HyperRect::from_bounds(&bounds)?;

    // Raw pointer smuggled as an integer so the closure is Send + Sync
    let f_data_ptr = f_data as usize;
    let f_fn = f;
    let failure = Arc::new(AtomicI32::new(0));
    let failure_in_objective = Arc::clone(&failure);

    let objective = move |x: &HyperRect| -> Interval {
        let lo: Vec<f64> = x.intervals().iter().map(|s| s.lower).collect();
        let hi: Vec<f64> = x.intervals().iter().map(|s| s.upper).collect();
        let mut out_lower: c_double = f64::NEG_INFINITY;
        let mut out_upper: c_double = f64::INFINITY;
        let rc = unsafe {
            f_fn(
                lo.len() as c_int,
                lo.as_ptr(),
                hi.as_ptr(),
                &mut out_lower,
                &mut out_upper,
                f_data_ptr as *mut c_void,
            )
        };
        if rc != 0 || out_lower.is_nan() || out_upper.is_nan() || out_lower > out_upper {
            let code = if rc != 0 { rc } else { -1 };
            let _ = failure_in_objective.compare_exchange(0, code, Ordering::Relaxed, Ordering::Relaxed);
            Interval::ENTIRE
        } else {
            Interval::new(out_lower, out_upper)
        }
    };

    let options = SolverOptions {
        x_tol,
        f_tol,
        max_iter: max_iter as usize,
        ..Default::default()
    };
    let result = Solver::new(objective, initial, options).maximize()?;

    match failure.load(Ordering::Relaxed) {
        0 => Ok(result),
        code => Err(SolverError::EvaluationFailed(code)),
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// FFI entry points
// ──────────────────────────────────────────────────────────────────────────────

/// Compute a proven upper bound on the maximum of `f` over a box.
///
/// # Safety
///
/// - `f` must be a valid function pointer.
/// - `lower` and `upper` must point to arrays of length `dimension`.
/// - `out_max` must point to a writable `double`, or be NULL.
/// - `f_data` is passed through to `f` and must remain valid for the call duration.
///
/// # Returns
///
/// `GLOBOPT_SUCCESS` (0) or a negative error code.
#[no_mangle]
pub unsafe extern "C" fn globopt_serial_solver(
    f: GloboptIntervalFuncC,
    f_data: *mut c_void,
    dimension: c_int,
    lower: *const c_double,
    upper: *const c_double,
    x_tol: c_double,
    f_tol: c_double,
    max_iter: c_int,
    out_max: *mut c_double,
) -> c_int {
    match run_from_c(f, f_data, dimension, lower, upper, x_tol, f_tol, max_iter) {
        Ok(result) => {
            if !out_max.is_null() {
                *out_max = result.max_upper;
            }
            GLOBOPT_SUCCESS
        }
        Err(e) => e.code(),
    }
}

/// Same as `globopt_serial_solver` but returns run statistics.
///
/// # Safety
///
/// Same safety requirements as `globopt_serial_solver`.
#[no_mangle]
pub unsafe extern "C" fn globopt_serial_solver_full(
    f: GloboptIntervalFuncC,
    f_data: *mut c_void,
    dimension: c_int,
    lower: *const c_double,
    upper: *const c_double,
    x_tol: c_double,
    f_tol: c_double,
    max_iter: c_int,
) -> GloboptResultC {
    match run_from_c(f, f_data, dimension, lower, upper, x_tol, f_tol, max_iter) {
        Ok(result) => GloboptResultC::from_result(&result),
        Err(e) => GloboptResultC::error(e.code()),
    }
}
