//! Pairwise intersection of trade-off function pieces.
//!
//! Each pairing reduces to a polynomial, hands it to [`crate::roots`], and
//! filters the roots to the half-plane where the hyperbolic sides are
//! defined (`x > b + 1e-3`).  Results are appended to a caller-provided
//! `Vec` so the sweep can reuse one buffer; every pairing appends at most
//! four roots, the limited/limited variant at most six (four interior plus
//! two crossings with a clamped constant tail).

use crate::hyplin::{HypOrLin, HyperbolicFunction, LinearFunction};
use crate::limited::LimitedFunction;
use crate::roots::{unique_cubic_roots, unique_quadratic_roots, unique_quartic_roots};

/// Offset below which two hyperbolic poles are considered coincident.
const DOMAIN_EPSILON: f64 = 1e-3;

// ── elementary pairings ───────────────────────────────────────────────────────

/// Intersection of two lines (at most one point).
pub fn linear_linear(lhs: &LinearFunction, rhs: &LinearFunction, out: &mut Vec<f64>) {
    if rhs.d != lhs.d {
        let x = (lhs.c - lhs.d * lhs.b - rhs.c + rhs.d * rhs.b) / (rhs.d - lhs.d);
        out.push(x);
    }
}

/// Intersection of a line with the positive branch of a hyperbolic.
///
/// Substituting `z = x − b_hyp` turns `d·(x−b)+c = a/z² + c_h` into a cubic
/// in `z`.  Only roots right of the pole count.
pub fn linear_hyperbolic(lhs: &LinearFunction, rhs: &HyperbolicFunction, out: &mut Vec<f64>) {
    if lhs.d != 0.0 {
        let roots = unique_cubic_roots(
            -lhs.d,
            rhs.c - lhs.c + lhs.b * lhs.d - lhs.d * rhs.b,
            0.0,
            rhs.a,
        );
        for z in roots.into_iter().flatten() {
            if z > DOMAIN_EPSILON {
                out.push(z + rhs.b);
            }
        }
    } else if (lhs.c - rhs.c).abs() > DOMAIN_EPSILON {
        let x = rhs.b + (rhs.a / (lhs.c - rhs.c)).sqrt();
        // A constant below the asymptote never meets the positive branch.
        if x.is_finite() {
            out.push(x);
        }
    }
}

/// Intersection of two hyperbolics restricted to their positive branches —
/// at most two unique points.
pub fn hyperbolic_hyperbolic(
    lhs: &HyperbolicFunction,
    rhs: &HyperbolicFunction,
    out: &mut Vec<f64>,
) {
    let a_1 = lhs.a;
    let b_1 = lhs.b;
    let c_1 = lhs.c;

    let a_2 = rhs.a;
    let b_2 = rhs.b;
    let c_2 = rhs.c;

    let dc = c_1 - c_2;
    let da = a_1 - a_2;
    let big_b = b_1 + b_2;
    let b_1b_1 = b_1 * b_1;
    let b_2b_2 = b_2 * b_2;
    let b_1b_2 = b_1 * b_2;

    let x_min = b_1.max(b_2) + DOMAIN_EPSILON;

    if dc != 0.0 {
        let a_1dc = a_1 / dc;
        let a_2dc = a_2 / dc;

        let a = 1.0;
        let b = -2.0 * big_b;
        let c = a_1dc - a_2dc + b_1b_1 + 4.0 * b_1b_2 + b_2b_2;
        let d = 2.0 * a_2dc * b_1 - 2.0 * a_1dc * b_2 - 2.0 * b_1 * b_2b_2 - 2.0 * b_2 * b_1b_1;
        let e = -a_2dc * b_1b_1 + a_1dc * b_2b_2 + b_1b_1 * b_2b_2;

        for x in unique_quartic_roots(a, b, c, d, e).into_iter().flatten() {
            if x > x_min {
                out.push(x);
            }
        }
    } else {
        // Equal offsets: the quartic degenerates to a quadratic.
        let c = da;
        let d = 2.0 * (a_1 * b_2 - a_2 * b_1);
        let e = a_1 * b_2b_2 - a_2 * b_1b_1;
        for x in unique_quadratic_roots(c, d, e).into_iter().flatten() {
            if x > x_min {
                out.push(x);
            }
        }
    }
}

// ── tagged dispatch ───────────────────────────────────────────────────────────

fn linear_any(lhs: &LinearFunction, rhs: &HypOrLin, out: &mut Vec<f64>) {
    match rhs.as_linear() {
        Some(lin) => linear_linear(lhs, &lin, out),
        None => {
            let HypOrLin::Hyperbolic(hyp) = rhs else {
                return;
            };
            linear_hyperbolic(lhs, hyp, out);
        }
    }
}

/// Intersection of two tagged pieces; at most four roots appended.
pub fn intersect(lhs: &HypOrLin, rhs: &HypOrLin, out: &mut Vec<f64>) {
    match (lhs.as_linear(), rhs.as_linear()) {
        (Some(lin), _) => linear_any(&lin, rhs, out),
        (None, Some(lin)) => linear_any(&lin, lhs, out),
        (None, None) => {
            let (HypOrLin::Hyperbolic(lh), HypOrLin::Hyperbolic(rh)) = (lhs, rhs) else {
                return;
            };
            hyperbolic_hyperbolic(lh, rh, out);
        }
    }
}

// ── limited functions ─────────────────────────────────────────────────────────

/// Intersection of two limited functions.
///
/// In addition to the interior intersections (filtered to the joint domain),
/// either function's clamped constant tail can cross the other function once
/// after the first one's domain has ended.
pub fn intersect_limited(lhs: &LimitedFunction, rhs: &LimitedFunction, out: &mut Vec<f64>) {
    let mut scratch: Vec<f64> = Vec::with_capacity(4);

    intersect(&lhs.function, &rhs.function, &mut scratch);
    for &x in &scratch {
        if lhs.min_x <= x && rhs.min_x <= x && lhs.max_x > x && rhs.max_x > x {
            out.push(x);
        }
    }

    scratch.clear();
    intersect(&HypOrLin::Constant(lhs.min_y()), &rhs.function, &mut scratch);
    if let Some(&x) = scratch.first() {
        if x > lhs.max_x && x >= rhs.min_x && x < rhs.max_x {
            out.push(x);
        }
    }

    scratch.clear();
    intersect(&HypOrLin::Constant(rhs.min_y()), &lhs.function, &mut scratch);
    if let Some(&x) = scratch.first() {
        if x > rhs.max_x && x >= lhs.min_x && x < lhs.max_x {
            out.push(x);
        }
    }
}
