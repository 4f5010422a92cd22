//! The three elementary piece shapes and their tagged union.
//!
//! # Shapes
//!
//! - linear: `f(x) = d·(x − b) + c`, defined for `x ≥ b`
//! - hyperbolic: `f(x) = a/(x − b)² + c`, defined for `x > b`, with `a > 0` —
//!   strictly decreasing and convex on its domain
//! - constant: `f(x) = c`
//!
//! `HypOrLin` is the tagged sum the rest of the crate works with.  It replaces
//! a dynamic class hierarchy with pattern matching; the payload is at most
//! three `f64`s plus the tag.

use crate::error::{FuncError, FuncResult};

// ── LinearFunction ────────────────────────────────────────────────────────────

/// `f(x) = d·(x − b) + c`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LinearFunction {
    /// Slope.
    pub d: f64,
    /// Horizontal shift.
    pub b: f64,
    /// Vertical offset.
    pub c: f64,
}

impl LinearFunction {
    pub fn new(d: f64, b: f64, c: f64) -> Self {
        Self { d, b, c }
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.d * (x - self.b) + self.c
    }

    /// `x` such that `f(x) = y`.  Fails on a flat line.
    pub fn inverse(&self, y: f64) -> FuncResult<f64> {
        if self.d == 0.0 {
            return Err(FuncError::NotInvertible(y));
        }
        Ok(self.b + (y - self.c) / self.d)
    }
}

// ── HyperbolicFunction ────────────────────────────────────────────────────────

/// `f(x) = a/(x − b)² + c` on `x > b`, with `a > 0`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct HyperbolicFunction {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl HyperbolicFunction {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let dx = x - self.b;
        self.a / (dx * dx) + self.c
    }

    #[inline]
    pub fn deriv(&self, x: f64) -> f64 {
        let dx = x - self.b;
        -2.0 * self.a / (dx * dx * dx)
    }

    /// `x > b` such that `f(x) = y`.  Only defined for `y > c`.
    pub fn inverse(&self, y: f64) -> FuncResult<f64> {
        if y <= self.c {
            return Err(FuncError::NotInvertible(y));
        }
        Ok(self.b + (self.a / (y - self.c)).sqrt())
    }
}

// ── HypOrLin ──────────────────────────────────────────────────────────────────

/// Tagged union of the three piece shapes.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum HypOrLin {
    Constant(f64),
    Linear(LinearFunction),
    Hyperbolic(HyperbolicFunction),
}

impl HypOrLin {
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            HypOrLin::Constant(c) => *c,
            HypOrLin::Linear(lin) => lin.eval(x),
            HypOrLin::Hyperbolic(hyp) => hyp.eval(x),
        }
    }

    /// First derivative at `x` (0 for constants).
    #[inline]
    pub fn deriv(&self, x: f64) -> f64 {
        match self {
            HypOrLin::Constant(_) => 0.0,
            HypOrLin::Linear(lin) => lin.d,
            HypOrLin::Hyperbolic(hyp) => hyp.deriv(x),
        }
    }

    /// Replace `x` by `x − dt`: shifts the function right by `dt`.
    pub fn shift(&mut self, dt: f64) {
        match self {
            HypOrLin::Constant(_) => {}
            HypOrLin::Linear(lin) => lin.b += dt,
            HypOrLin::Hyperbolic(hyp) => hyp.b += dt,
        }
    }

    /// Add `dy` to the function value everywhere.
    pub fn offset(&mut self, dy: f64) {
        match self {
            HypOrLin::Constant(c) => *c += dy,
            HypOrLin::Linear(lin) => lin.c += dy,
            HypOrLin::Hyperbolic(hyp) => hyp.c += dy,
        }
    }

    /// `x` such that `f(x) = y`, for strictly monotone pieces.
    pub fn inverse(&self, y: f64) -> FuncResult<f64> {
        match self {
            HypOrLin::Constant(_) => Err(FuncError::NotInvertible(y)),
            HypOrLin::Linear(lin) => lin.inverse(y),
            HypOrLin::Hyperbolic(hyp) => hyp.inverse(y),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, HypOrLin::Constant(_))
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, HypOrLin::Linear(_))
    }

    pub fn is_hyperbolic(&self) -> bool {
        matches!(self, HypOrLin::Hyperbolic(_))
    }

    /// View constants as zero-slope linear functions; used by the
    /// intersection dispatch, which only distinguishes linear/hyperbolic.
    pub fn as_linear(&self) -> Option<LinearFunction> {
        match self {
            HypOrLin::Constant(c) => Some(LinearFunction::new(0.0, 0.0, *c)),
            HypOrLin::Linear(lin) => Some(*lin),
            HypOrLin::Hyperbolic(_) => None,
        }
    }
}

impl From<LinearFunction> for HypOrLin {
    fn from(lin: LinearFunction) -> Self {
        HypOrLin::Linear(lin)
    }
}

impl From<HyperbolicFunction> for HypOrLin {
    fn from(hyp: HyperbolicFunction) -> Self {
        HypOrLin::Hyperbolic(hyp)
    }
}
