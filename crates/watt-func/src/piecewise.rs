//! Piecewise trade-off functions.
//!
//! A `PiecewiseFunction` is an ordered sequence of [`LimitedFunction`]
//! pieces representing a Pareto front between duration (x) and consumption
//! (y): globally non-increasing, with piece domains sorted left to right.
//! Neighbouring domains normally touch; where the sweep leaves a gap the
//! previous piece's clamp covers it, so evaluation treats "the last piece
//! starting at or before x" as authoritative.

use crate::hyplin::HypOrLin;
use crate::limited::LimitedFunction;

const CONTINUITY_EPSILON: f64 = 1e-3;

/// An ordered, non-increasing sequence of limited pieces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PiecewiseFunction {
    pub pieces: Vec<LimitedFunction>,
}

impl PiecewiseFunction {
    pub fn from_pieces(pieces: Vec<LimitedFunction>) -> Self {
        let function = Self { pieces };
        debug_assert!(function.is_sorted());
        function
    }

    /// A single-piece function.
    pub fn single(piece: LimitedFunction) -> Self {
        Self { pieces: vec![piece] }
    }

    /// A fixed `(duration, consumption)` point.
    pub fn constant(duration: f64, consumption: f64) -> Self {
        Self::single(LimitedFunction::constant(duration, consumption))
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Earliest representable duration; `+∞` when empty.
    #[inline]
    pub fn min_x(&self) -> f64 {
        self.pieces.first().map_or(f64::INFINITY, |p| p.min_x)
    }

    /// Latest duration with its own piece; the clamp extends beyond.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.pieces.last().map_or(f64::NEG_INFINITY, |p| p.max_x)
    }

    /// Consumption at (and beyond) `max_x` — the cheapest point of the front.
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.pieces.last().map_or(f64::INFINITY, |p| p.min_y())
    }

    /// Consumption at `min_x` — the most expensive point of the front.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.pieces.first().map_or(f64::INFINITY, |p| p.max_y())
    }

    /// Evaluate at `x`: `+∞` left of the domain, clamped right of it.
    pub fn eval(&self, x: f64) -> f64 {
        if self.pieces.is_empty() || x < self.min_x() {
            return f64::INFINITY;
        }
        // Last piece whose domain starts at or before x.
        let idx = self.pieces.partition_point(|p| p.min_x <= x);
        self.pieces[idx - 1].eval(x)
    }

    /// Smallest `x` with `f(x) ≤ y`, if the front ever gets that cheap.
    pub fn inverse(&self, y: f64) -> Option<f64> {
        for piece in &self.pieces {
            if piece.min_y() <= y {
                return piece.inverse(y).ok();
            }
        }
        None
    }

    /// Append a piece on the right.
    pub fn push_piece(&mut self, piece: LimitedFunction) {
        if let Some(last) = self.pieces.last() {
            debug_assert!(
                piece.min_x >= last.max_x - CONTINUITY_EPSILON,
                "pieces out of order: {} after {}",
                piece.min_x,
                last.max_x
            );
        }
        self.pieces.push(piece);
    }

    /// Shift the whole front right by `dt`.
    pub fn shift(&mut self, dt: f64) {
        for piece in &mut self.pieces {
            piece.shift(dt);
        }
    }

    /// Add `dy` to every piece.
    pub fn offset(&mut self, dy: f64) {
        for piece in &mut self.pieces {
            piece.offset(dy);
        }
    }

    /// Restrict the domain to `[lo, hi]`, dropping and trimming pieces.
    ///
    /// Clipping entirely into the clamp tail leaves a single constant point
    /// at `lo`.  The piece buffer is reused.
    pub fn limit_from_x(&mut self, lo: f64, hi: f64) {
        if self.pieces.is_empty() {
            return;
        }
        if lo >= self.max_x() {
            let tail = self.min_y();
            self.pieces.clear();
            self.pieces.push(LimitedFunction::new(lo, lo, HypOrLin::Constant(tail)));
            return;
        }

        self.pieces.retain(|p| p.max_x > lo && p.min_x < hi);
        if let Some(first) = self.pieces.first_mut() {
            if first.min_x < lo {
                first.min_x = lo;
            }
        }
        if let Some(last) = self.pieces.last_mut() {
            if hi.is_finite() && last.max_x > hi {
                last.max_x = hi.max(last.min_x);
            }
        }
    }

    /// Remove the expensive fast end where consumption exceeds `cap`.
    ///
    /// The front is non-increasing, so only a prefix can violate the bound.
    /// Returns `true` when nothing feasible remains.
    pub fn clip_above(&mut self, cap: f64) -> bool {
        let mut drop_prefix = 0;
        let mut new_min_x = None;

        for (idx, piece) in self.pieces.iter().enumerate() {
            if piece.max_y() <= cap {
                break;
            }
            if piece.min_y() <= cap {
                // The bound is crossed inside this piece.
                if let Ok(x) = piece.inverse(cap) {
                    new_min_x = Some(x);
                }
                drop_prefix = idx;
                break;
            }
            drop_prefix = idx + 1;
        }

        self.pieces.drain(..drop_prefix);
        if let (Some(x), Some(first)) = (new_min_x, self.pieces.first_mut()) {
            first.min_x = first.min_x.max(x);
        }
        self.pieces.is_empty()
    }

    pub fn shrink_to_fit(&mut self) {
        self.pieces.shrink_to_fit();
    }

    fn is_sorted(&self) -> bool {
        self.pieces
            .windows(2)
            .all(|w| w[1].min_x >= w[0].max_x - CONTINUITY_EPSILON)
    }
}
