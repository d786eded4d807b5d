//! Axis-aligned boxes over which the objective is bounded.
//!
//! A `HyperRect` is an ordered list of closed intervals, one per dimension.
//! Boxes are never mutated once queued; refinement replaces a box by the two
//! halves produced by [`HyperRect::split`].

use std::fmt;

use crate::error::{Result, SolverError};
use crate::interval::Interval;

/// A rectangular sub-region of the search domain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Interval>", into = "Vec<Interval>"))]
pub struct HyperRect {
    sides: Vec<Interval>,
}

impl HyperRect {
    /// Create a box from its per-dimension intervals.
    ///
    /// Fails on an empty list or on a side with non-finite or inverted bounds.
    /// An unbounded side could never be bisected down to `x_tol`.
    pub fn new(sides: Vec<Interval>) -> Result<Self> {
        if sides.is_empty() {
            return Err(SolverError::EmptyBox);
        }
        for (dim, side) in sides.iter().enumerate() {
            if !side.lower.is_finite() || !side.upper.is_finite() || side.lower > side.upper {
                return Err(SolverError::InvalidInterval { dim });
            }
        }
        Ok(Self { sides })
    }

    /// Create a box from `(lower, upper)` pairs.
    pub fn from_bounds(bounds: &[(f64, f64)]) -> Result<Self> {
        let mut sides = Vec::with_capacity(bounds.len());
        for (dim, &(lo, hi)) in bounds.iter().enumerate() {
            let side = Interval::try_new(lo, hi).map_err(|_| SolverError::InvalidInterval { dim })?;
            sides.push(side);
        }
        Self::new(sides)
    }

    /// Number of dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.sides.len()
    }

    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.sides
    }

    /// Side interval in dimension `i`.
    #[inline]
    pub fn side(&self, i: usize) -> Interval {
        self.sides[i]
    }

    /// Diameter of the box: the widest side.
    pub fn diameter(&self) -> f64 {
        self.sides.iter().map(Interval::width).fold(0.0_f64, f64::max)
    }

    /// Index of the first side attaining the maximum width.
    pub fn widest_dim(&self) -> usize {
        let mut imax = 0;
        let mut wmax = self.sides[0].width();
        for (i, side) in self.sides.iter().enumerate().skip(1) {
            if side.width() > wmax {
                wmax = side.width();
                imax = i;
            }
        }
        imax
    }

    /// Degenerate box at the midpoint of every side.
    pub fn midpoint(&self) -> Self {
        Self {
            sides: self.sides.iter().map(|s| Interval::point(s.mid())).collect(),
        }
    }

    /// Bisect the widest side at its midpoint.
    ///
    /// The two halves share the cut coordinate and together cover `self`.
    pub fn split(&self) -> [Self; 2] {
        let i = self.widest_dim();
        let side = self.sides[i];
        let m = side.mid();

        let mut left = self.sides.clone();
        let mut right = self.sides.clone();
        left[i] = Interval::new(side.lower, m);
        right[i] = Interval::new(m, side.upper);

        [Self { sides: left }, Self { sides: right }]
    }

    /// True if the point `x` lies in the box.
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dim() && self.sides.iter().zip(x).all(|(s, &xi)| s.contains(xi))
    }
}

impl TryFrom<Vec<Interval>> for HyperRect {
    type Error = SolverError;

    fn try_from(sides: Vec<Interval>) -> Result<Self> {
        Self::new(sides)
    }
}

impl From<HyperRect> for Vec<Interval> {
    fn from(rect: HyperRect) -> Self {
        rect.sides
    }
}

impl fmt::Display for HyperRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.sides.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "[{}, {}]", s.lower, s.upper)?;
        }
        write!(f, "]")
    }
}
