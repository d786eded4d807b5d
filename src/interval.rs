//! Closed real intervals with outward-rounded arithmetic.
//!
//! Every operation that can round returns an enclosure widened by one ulp on
//! each side, so a result computed from enclosures of the operands always
//! encloses the exact real result. Operations that are exact in floating point
//! (negation, `abs`, `hull`, `min`/`max`) are not widened.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{Result, SolverError};

/// A closed interval `[lower, upper]` with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

#[inline]
fn rounded(lower: f64, upper: f64) -> Interval {
    Interval {
        lower: lower.next_down(),
        upper: upper.next_up(),
    }
}

impl Interval {
    /// The whole extended real line.
    pub const ENTIRE: Self = Self {
        lower: f64::NEG_INFINITY,
        upper: f64::INFINITY,
    };

    /// Create a new interval. Bounds must be ordered.
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "lower ({}) > upper ({})", lower, upper);
        Self { lower, upper }
    }

    /// Checked constructor rejecting non-finite and inverted bounds.
    pub fn try_new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(SolverError::InvalidInterval { dim: 0 });
        }
        Ok(Self { lower, upper })
    }

    /// Degenerate interval `[v, v]`.
    #[inline]
    pub fn point(v: f64) -> Self {
        Self { lower: v, upper: v }
    }

    /// `upper - lower`.
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Midpoint, computed without intermediate overflow.
    #[inline]
    pub fn mid(&self) -> f64 {
        let m = 0.5 * (self.lower + self.upper);
        if m.is_finite() {
            m
        } else {
            0.5 * self.lower + 0.5 * self.upper
        }
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.lower == self.upper
    }

    /// Smallest interval containing both operands.
    #[inline]
    pub fn hull(self, other: Self) -> Self {
        Self {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Range of `max(x, y)` for `x` in `self`, `y` in `other`.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            lower: self.lower.max(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Range of `min(x, y)` for `x` in `self`, `y` in `other`.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self {
            lower: self.lower.min(other.lower),
            upper: self.upper.min(other.upper),
        }
    }

    pub fn abs(self) -> Self {
        if self.lower >= 0.0 {
            self
        } else if self.upper <= 0.0 {
            -self
        } else {
            Self {
                lower: 0.0,
                upper: self.upper.max(-self.lower),
            }
        }
    }

    /// Range of `x^2`; tighter than `self * self` when `self` straddles zero.
    pub fn sqr(self) -> Self {
        if self.lower >= 0.0 {
            Self {
                lower: (self.lower * self.lower).next_down().max(0.0),
                upper: (self.upper * self.upper).next_up(),
            }
        } else if self.upper <= 0.0 {
            Self {
                lower: (self.upper * self.upper).next_down().max(0.0),
                upper: (self.lower * self.lower).next_up(),
            }
        } else {
            let m = self.lower.abs().max(self.upper);
            Self {
                lower: 0.0,
                upper: (m * m).next_up(),
            }
        }
    }

    /// Range of `x^n`.
    ///
    /// Even powers are computed by repeated squaring; odd powers use
    /// monotonicity and enclose each endpoint separately.
    pub fn powi(self, n: u32) -> Self {
        if n % 2 == 1 && n > 1 {
            let lo = Self::point(self.lower).pow_rec(n);
            let hi = Self::point(self.upper).pow_rec(n);
            Self {
                lower: lo.lower,
                upper: hi.upper,
            }
        } else {
            self.pow_rec(n)
        }
    }

    fn pow_rec(self, n: u32) -> Self {
        match n {
            0 => Self::point(1.0),
            1 => self,
            _ if n % 2 == 0 => self.pow_rec(n / 2).sqr(),
            _ => self * self.pow_rec(n - 1),
        }
    }

    /// Range of `sqrt(x)` over the non-negative part of `self`.
    pub fn sqrt(self) -> Self {
        Self {
            lower: self.lower.max(0.0).sqrt().next_down().max(0.0),
            upper: self.upper.max(0.0).sqrt().next_up(),
        }
    }

    pub fn exp(self) -> Self {
        Self {
            lower: self.lower.exp().next_down().max(0.0),
            upper: self.upper.exp().next_up(),
        }
    }
}

impl Add for Interval {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        rounded(self.lower + rhs.lower, self.upper + rhs.upper)
    }
}

impl Sub for Interval {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        rounded(self.lower - rhs.upper, self.upper - rhs.lower)
    }
}

/// Endpoint product with `0 * inf = 0`.
#[inline]
fn mul_bound(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

impl Mul for Interval {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let a = mul_bound(self.lower, rhs.lower);
        let b = mul_bound(self.lower, rhs.upper);
        let c = mul_bound(self.upper, rhs.lower);
        let d = mul_bound(self.upper, rhs.upper);
        rounded(a.min(b).min(c).min(d), a.max(b).max(c).max(d))
    }
}

impl Neg for Interval {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            lower: -self.upper,
            upper: -self.lower,
        }
    }
}

impl Add<f64> for Interval {
    type Output = Self;
    #[inline]
    fn add(self, rhs: f64) -> Self {
        self + Self::point(rhs)
    }
}

impl Sub<f64> for Interval {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: f64) -> Self {
        self - Self::point(rhs)
    }
}

impl Mul<f64> for Interval {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        if rhs >= 0.0 {
            rounded(mul_bound(self.lower, rhs), mul_bound(self.upper, rhs))
        } else {
            rounded(mul_bound(self.upper, rhs), mul_bound(self.lower, rhs))
        }
    }
}

impl From<f64> for Interval {
    fn from(v: f64) -> Self {
        Self::point(v)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.15e}, {:.15e}]", self.lower, self.upper)
    }
}
