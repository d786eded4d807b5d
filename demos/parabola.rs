//! Bound the maximum of a 1-D parabola and a 2-D Himmelblau surface.
//!
//! Run with: cargo run --example parabola --release
//!
//! Compare serial and parallel: PARALLEL=1 cargo run --example parabola --release

use std::time::Instant;

use interval_globopt::{solve, HyperRect, Interval, Solver, SolverOptions};

/// -(x - 3)^2 + 10, maximum 10 at x = 3.
fn parabola(x: &HyperRect) -> Interval {
    -(x.side(0) - 3.0).sqr() + 10.0
}

/// Negated Himmelblau, four global maxima of value 0.
fn neg_himmelblau(x: &HyperRect) -> Interval {
    let (a, b) = (x.side(0), x.side(1));
    -((a.sqr() + b - 11.0).sqr() + (a + b.sqr() - 7.0).sqr())
}

fn main() {
    let domain = HyperRect::from_bounds(&[(0.0, 10.0)]).unwrap();
    let bound = solve(&domain, 1e-9, 1e-9, 100_000, parabola).unwrap();
    println!("parabola on {}: max <= {:.12}", domain, bound);

    let parallel = std::env::var("PARALLEL").is_ok();
    let domain = HyperRect::from_bounds(&[(-5.0, 5.0); 2]).unwrap();
    let opts = SolverOptions {
        x_tol: 1e-4,
        f_tol: 1e-6,
        max_iter: 1_000_000,
        parallel,
        ..Default::default()
    };

    let start = Instant::now();
    let result = Solver::new(neg_himmelblau, domain.clone(), opts).maximize().unwrap();
    let elapsed = start.elapsed();

    println!(
        "himmelblau on {} ({}): {:?}",
        domain,
        if parallel { "parallel" } else { "serial" },
        elapsed
    );
    println!("{}", result);
}
