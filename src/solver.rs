//! Interval branch-and-bound global maximizer.
//!
//! Boxes are processed from a FIFO work queue (breadth-first, not best-first).
//! Each box is either retired, folding its enclosure's upper bound into the
//! running maximum bound, or bisected into two children that go to the back
//! of the queue. The run ends when the queue is empty.
//!
//! # State
//!
//! | Field          | Meaning                                              |
//! |----------------|------------------------------------------------------|
//! | `f_best_low`   | best lower bound seen at a child midpoint probe      |
//! | `f_best_high`  | max of the upper bounds of all retired boxes         |
//! | `iter_count`   | number of subdivisions so far                        |
//!
//! Both bounds start at `-inf` and only increase. `f_best_high` is the answer.
//!
//! # Retirement tests
//!
//! A box `X` with enclosure `f = F(X)` is retired when any of
//! `f.upper < f_best_low`, `diam(X) <= x_tol`, `width(f) <= f_tol`,
//! `iter_count > max_iter` holds. Note the strict `>` on the budget: with
//! `max_iter = 0` the first box is still subdivided once.
//!
//! `f_best_low` is raised from the lower bound of `F` at the midpoint of each
//! new child, not from the child's own enclosure.

use std::collections::VecDeque;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{RetireReason, Result, SolverError};
use crate::hyperrect::HyperRect;
use crate::interval::Interval;
use crate::trace::TraceWriter;
use crate::trace_write;
use crate::types::{ObjectiveFn, RetireCounts, SolveResult, SolverOptions};

/// Mutable accumulation state of one solver run.
#[derive(Debug, Clone)]
struct SearchState {
    f_best_low: f64,
    f_best_high: f64,
    iter_count: usize,
    nbox: usize,
    nfev: usize,
    retired: RetireCounts,
}

impl SearchState {
    fn new() -> Self {
        Self {
            f_best_low: f64::NEG_INFINITY,
            f_best_high: f64::NEG_INFINITY,
            iter_count: 0,
            nbox: 0,
            nfev: 0,
            retired: RetireCounts::default(),
        }
    }

    /// First retirement test that holds for a box, if any.
    fn retire_reason(
        &self,
        f: Interval,
        w: f64,
        fw: f64,
        options: &SolverOptions,
    ) -> Option<RetireReason> {
        if f.upper < self.f_best_low {
            Some(RetireReason::Dominated)
        } else if w <= options.x_tol {
            Some(RetireReason::SmallBox)
        } else if fw <= options.f_tol {
            Some(RetireReason::TightBound)
        } else if self.iter_count > options.max_iter {
            Some(RetireReason::Budget)
        } else {
            None
        }
    }

    fn retire(&mut self, upper: f64, reason: RetireReason) {
        self.f_best_high = self.f_best_high.max(upper);
        self.retired.record(reason);
    }

    /// Raise `f_best_low` from a midpoint probe. Returns true if it moved.
    fn absorb_probe(&mut self, e: Interval) -> bool {
        self.nfev += 1;
        if e.lower > self.f_best_low {
            self.f_best_low = e.lower;
            true
        } else {
            false
        }
    }

    fn into_result(self) -> SolveResult {
        SolveResult {
            max_upper: self.f_best_high,
            best_lower: self.f_best_low,
            nit: self.iter_count,
            nbox: self.nbox,
            nfev: self.nfev,
            retired: self.retired,
        }
    }
}

/// Branch-and-bound maximizer over an interval box.
pub struct Solver {
    func: Arc<ObjectiveFn>,
    initial: HyperRect,
    options: SolverOptions,
    tracer: Option<Arc<TraceWriter>>,
}

impl Solver {
    /// Create a new solver.
    pub fn new(
        func: impl Fn(&HyperRect) -> Interval + Send + Sync + 'static,
        initial: HyperRect,
        options: SolverOptions,
    ) -> Self {
        Self {
            func: Arc::new(func),
            initial,
            options,
            tracer: None,
        }
    }

    /// Attach a trace writer. Events are only recorded with the `trace` feature.
    pub fn with_tracer(mut self, tracer: Arc<TraceWriter>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Reject negative or NaN tolerances.
    ///
    /// The box itself is validated by `HyperRect`'s constructors.
    pub fn validate_inputs(&self) -> Result<()> {
        for (name, value) in [("x_tol", self.options.x_tol), ("f_tol", self.options.f_tol)] {
            if value.is_nan() || value < 0.0 {
                return Err(SolverError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }

    /// Run the solver until the work queue is empty.
    pub fn maximize(&self) -> Result<SolveResult> {
        self.validate_inputs()?;

        let mut state = SearchState::new();
        let mut queue: VecDeque<HyperRect> = VecDeque::new();
        queue.push_back(self.initial.clone());

        while !queue.is_empty() {
            if self.options.parallel && queue.len() >= self.options.min_parallel_evals.max(2) {
                // Enclosures are pure, so a whole generation can be bounded up
                // front; decisions below still run in queue order.
                let generation: Vec<HyperRect> = queue.drain(..).collect();
                let func = Arc::clone(&self.func);
                let bounds: Vec<Interval> = generation.par_iter().map(|x| func(x)).collect();
                for (x, f) in generation.into_iter().zip(bounds) {
                    self.process_box(&mut state, &mut queue, x, f);
                }
            } else if let Some(x) = queue.pop_front() {
                let f = (self.func)(&x);
                self.process_box(&mut state, &mut queue, x, f);
            }
        }

        trace_write!(
            self.tracer,
            "TRACE DONE f_best_high={:e} f_best_low={:e} nit={} nbox={} nfev={}",
            state.f_best_high,
            state.f_best_low,
            state.iter_count,
            state.nbox,
            state.nfev
        );

        Ok(state.into_result())
    }

    /// Retire or split one box whose enclosure `f` is already known.
    fn process_box(
        &self,
        state: &mut SearchState,
        queue: &mut VecDeque<HyperRect>,
        x: HyperRect,
        f: Interval,
    ) {
        let box_id = state.nbox;
        state.nbox += 1;
        state.nfev += 1;

        let w = x.diameter();
        let fw = f.width();
        trace_write!(
            self.tracer,
            "TRACE POP box={} f=[{:e},{:e}] w={:e} fw={:e}",
            box_id,
            f.lower,
            f.upper,
            w,
            fw
        );

        if let Some(reason) = state.retire_reason(f, w, fw, &self.options) {
            state.retire(f.upper, reason);
            trace_write!(
                self.tracer,
                "TRACE RETIRE box={} reason={} upper={:e} f_best_high={:e}",
                box_id,
                reason.tag(),
                f.upper,
                state.f_best_high
            );
            return;
        }

        state.iter_count += 1;
        trace_write!(
            self.tracer,
            "TRACE SPLIT box={} iter={} dim={}",
            box_id,
            state.iter_count,
            x.widest_dim()
        );

        let children = x.split();
        let probes = self.probe_midpoints(&children);
        for (k, (child, e)) in children.into_iter().zip(probes).enumerate() {
            state.absorb_probe(e);
            trace_write!(
                self.tracer,
                "TRACE PROBE child={} e_lower={:e} f_best_low={:e}",
                k,
                e.lower,
                state.f_best_low
            );
            queue.push_back(child);
        }
    }

    /// Evaluate `F` at the midpoint of each child.
    fn probe_midpoints(&self, children: &[HyperRect; 2]) -> [Interval; 2] {
        let func = &self.func;
        if self.options.parallel && self.options.min_parallel_evals <= 2 {
            let (a, b) = rayon::join(
                || func(&children[0].midpoint()),
                || func(&children[1].midpoint()),
            );
            [a, b]
        } else {
            [func(&children[0].midpoint()), func(&children[1].midpoint())]
        }
    }
}

/// Maximize `func` over `initial_box` and return the proven upper bound.
///
/// Convenience wrapper around [`Solver`] with serial evaluation.
pub fn solve(
    initial_box: &HyperRect,
    x_tol: f64,
    f_tol: f64,
    max_iter: usize,
    func: impl Fn(&HyperRect) -> Interval + Send + Sync + 'static,
) -> Result<f64> {
    let options = SolverOptions {
        x_tol,
        f_tol,
        max_iter,
        ..Default::default()
    };
    Solver::new(func, initial_box.clone(), options)
        .maximize()
        .map(|r| r.max_upper)
}
