//! Soundness, convergence, termination, and determinism of the solver on
//! analytic objectives with known maxima.
//!
//! All objectives are natural interval extensions built from the crate's
//! `Interval` operations, which are sound and inclusion-isotone.

use interval_globopt::{HyperRect, Interval, SolveResult, Solver, SolverOptions};

// ─────────────────────────────────────────────────────────────────────────────
// Test functions (maximization form)
// ─────────────────────────────────────────────────────────────────────────────

/// -(x^4 - 16x^2 + 5x) / 2 summed over coordinates. Negated Styblinski-Tang.
fn neg_styblinski_tang(x: &HyperRect) -> Interval {
    let mut sum = Interval::point(0.0);
    for &xi in x.intervals() {
        sum = sum + (xi.powi(4) - xi.sqr() * 16.0 + xi * 5.0);
    }
    -(sum * 0.5)
}

/// Per-dimension maximum of the negated Styblinski-Tang function.
const NEG_ST_MAX_PER_DIM: f64 = 39.16616570377142;

/// -((x - 1)^2 + (y + 0.5)^2), maximum 0 at (1, -0.5).
fn neg_shifted_sphere(x: &HyperRect) -> Interval {
    -((x.side(0) - 1.0).sqr() + (x.side(1) + 0.5).sqr())
}

/// Negated Himmelblau: four global maxima of value 0.
fn neg_himmelblau(x: &HyperRect) -> Interval {
    let (a, b) = (x.side(0), x.side(1));
    -((a.sqr() + b - 11.0).sqr() + (a + b.sqr() - 7.0).sqr())
}

/// x - x^2 on [0, 1], maximum 0.25 at 0.5. The natural extension suffers from
/// the dependency effect, so the bound only tightens as boxes shrink.
fn dependent_quadratic(x: &HyperRect) -> Interval {
    let xi = x.side(0);
    xi - xi.sqr()
}

/// Unit step at 0.5. Boxes straddling the jump get the hull of both levels.
fn step(x: &HyperRect) -> Interval {
    let xi = x.side(0);
    let below = Interval::point(0.0);
    let above = Interval::point(1.0);
    if xi.upper < 0.5 {
        below
    } else if xi.lower >= 0.5 {
        above
    } else {
        below.hull(above)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn run(
    func: fn(&HyperRect) -> Interval,
    bounds: &[(f64, f64)],
    x_tol: f64,
    f_tol: f64,
    max_iter: usize,
) -> SolveResult {
    let domain = HyperRect::from_bounds(bounds).unwrap();
    let opts = SolverOptions {
        x_tol,
        f_tol,
        max_iter,
        ..Default::default()
    };
    Solver::new(func, domain, opts).maximize().unwrap()
}

/// Largest lower bound over a uniform grid of point evaluations.
fn grid_max(func: fn(&HyperRect) -> Interval, bounds: &[(f64, f64)], steps: usize) -> f64 {
    let n = bounds.len();
    let mut best = f64::NEG_INFINITY;
    let mut idx = vec![0usize; n];
    loop {
        let point: Vec<(f64, f64)> = idx
            .iter()
            .zip(bounds)
            .map(|(&k, &(lo, hi))| {
                let t = lo + (hi - lo) * k as f64 / steps as f64;
                (t, t)
            })
            .collect();
        let e = func(&HyperRect::from_bounds(&point).unwrap());
        best = best.max(e.lower);

        let mut d = 0;
        while d < n {
            idx[d] += 1;
            if idx[d] <= steps {
                break;
            }
            idx[d] = 0;
            d += 1;
        }
        if d == n {
            return best;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Soundness
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_styblinski_tang_1d_bound_is_sound_and_tight() {
    let result = run(neg_styblinski_tang, &[(-5.0, 5.0)], 1e-7, 1e-7, 1_000_000);
    assert!(
        result.max_upper >= NEG_ST_MAX_PER_DIM - 1e-9,
        "bound {} below true max {}",
        result.max_upper,
        NEG_ST_MAX_PER_DIM
    );
    assert!(result.max_upper < NEG_ST_MAX_PER_DIM + 1e-3, "bound {}", result.max_upper);
    assert!(result.best_lower <= result.max_upper);
}

#[test]
fn test_styblinski_tang_2d_bound_is_sound() {
    // The natural extension overestimates linearly in the box width here, so
    // keep x_tol moderate in 2-D to bound the number of surviving boxes.
    let result = run(neg_styblinski_tang, &[(-5.0, 5.0); 2], 1e-3, 1e-6, 1_000_000);
    let true_max = 2.0 * NEG_ST_MAX_PER_DIM;
    assert!(result.max_upper >= true_max - 1e-9, "bound {}", result.max_upper);
    assert!(result.max_upper < true_max + 0.5, "bound {}", result.max_upper);
}

#[test]
fn test_shifted_sphere_2d() {
    let result = run(neg_shifted_sphere, &[(-2.0, 3.0), (-3.0, 2.0)], 1e-6, 1e-9, 1_000_000);
    assert!(result.max_upper >= 0.0);
    assert!(result.max_upper < 1e-6, "bound {}", result.max_upper);
}

#[test]
fn test_himmelblau_2d() {
    let result = run(neg_himmelblau, &[(-5.0, 5.0); 2], 1e-4, 1e-6, 1_000_000);
    assert!(result.max_upper >= 0.0);
    assert!(result.max_upper < 1e-1, "bound {}", result.max_upper);
}

#[test]
fn test_discontinuous_objective_bound_is_sound() {
    let result = run(step, &[(0.0, 1.0)], 1e-6, 0.5, 1_000_000);
    assert_eq!(result.max_upper, 1.0);
    assert_eq!(result.best_lower, 1.0);
    // Constant pieces are bounded exactly and retire on f_tol at once.
    assert!(step(&HyperRect::from_bounds(&[(0.6, 0.9)]).unwrap()).is_point());
    assert!(!step(&HyperRect::from_bounds(&[(0.4, 0.6)]).unwrap()).is_point());
}

#[test]
fn test_unbounded_domain_is_rejected() {
    let inf = f64::INFINITY;
    for bounds in [vec![(-inf, inf)], vec![(0.0, inf)], vec![(0.0, 1.0), (-inf, 0.0)]] {
        assert!(
            HyperRect::from_bounds(&bounds).is_err(),
            "domain {:?} must be rejected",
            bounds
        );
    }
}

#[test]
fn test_bound_dominates_sampled_values() {
    let cases: [(fn(&HyperRect) -> Interval, Vec<(f64, f64)>); 3] = [
        (neg_styblinski_tang, vec![(-5.0, 5.0)]),
        (neg_shifted_sphere, vec![(-2.0, 3.0), (-3.0, 2.0)]),
        (neg_himmelblau, vec![(-5.0, 5.0), (-5.0, 5.0)]),
    ];
    for (func, bounds) in cases {
        // Coarse tolerances and a small budget: the bound is loose but sound.
        let result = run(func, &bounds, 1e-1, 1e-1, 50);
        let sampled = grid_max(func, &bounds, 40);
        assert!(
            result.max_upper >= sampled,
            "bound {} below sampled value {}",
            result.max_upper,
            sampled
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convergence, termination, determinism
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_tighter_tolerances_never_loosen_the_bound() {
    let mut previous = f64::INFINITY;
    for k in 1..=8 {
        let tol = 10f64.powi(-k);
        let result = run(dependent_quadratic, &[(0.0, 1.0)], tol, tol, 1_000_000);
        assert!(result.max_upper >= 0.25, "tol={} bound={}", tol, result.max_upper);
        assert!(
            result.max_upper <= previous,
            "tol={} bound {} exceeds looser bound {}",
            tol,
            result.max_upper,
            previous
        );
        previous = result.max_upper;
    }
    assert!(previous - 0.25 < 1e-6, "final bound {}", previous);
}

#[test]
fn test_terminates_on_x_tol_alone() {
    // A constant-width enclosure never satisfies f_tol = 0 and is never
    // dominated, so only x_tol stops refinement: [0, 1] is cut down to
    // 128 leaves of width 1/128 <= 0.01.
    let result = run(|_| Interval::new(-1.0, 1.0), &[(0.0, 1.0)], 0.01, 0.0, usize::MAX);
    assert_eq!(result.nit, 127);
    assert_eq!(result.nbox, 255);
    assert_eq!(result.retired.small_box, 128);
    assert_eq!(result.max_upper, 1.0);
}

#[test]
fn test_identical_inputs_identical_output() {
    let a = run(neg_himmelblau, &[(-5.0, 5.0); 2], 1e-3, 1e-4, 200_000);
    let b = run(neg_himmelblau, &[(-5.0, 5.0); 2], 1e-3, 1e-4, 200_000);
    assert_eq!(a, b);
}

#[test]
fn test_budget_caps_subdivisions() {
    for max_iter in [0usize, 1, 5, 40] {
        let result = run(neg_styblinski_tang, &[(-5.0, 5.0); 2], 0.0, 0.0, max_iter);
        // The check is strict, so one extra subdivision gets through.
        assert!(result.nit <= max_iter + 1, "max_iter={} nit={}", max_iter, result.nit);
        assert!(result.max_upper >= 2.0 * NEG_ST_MAX_PER_DIM - 1e-9);
    }
}
