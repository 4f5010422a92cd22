//! Series composition of trade-off functions.
//!
//! Linking `f ⊕ g` answers: given `t` total seconds for two consecutive
//! road segments, what is the least total consumption over all splits
//! `t₁ + t₂ = t` with `t₁ ∈ dom(f)`, `t₂ ∈ dom(g)`?  For convex decreasing
//! pieces the optimum equalises derivatives (`f'(t₁) = g'(t₂)`) whenever
//! both are interior, and pins one side to a domain bound otherwise, so a
//! piece pair yields at most three regimes:
//!
//! - hyperbolic ⊕ hyperbolic: matched regime is again hyperbolic with
//!   `∛a' = ∛a_f + ∛a_g`, `b' = b_f + b_g`, `c' = c_f + c_g`
//! - linear ⊕ hyperbolic: time flows into the hyperbola until its slope
//!   flattens to the line's, then into the line, then back
//! - linear ⊕ linear: the steeper slope soaks up time first
//! - anything ⊕ constant: a shift and offset
//!
//! Each produced regime also carries the *parent-time* map `t ↦ t₁`, linear
//! per regime, from which the search assembles the label delta used for
//! path reconstruction.

use crate::envelope::lower_envelope_indexed;
use crate::hyplin::{HypOrLin, HyperbolicFunction, LinearFunction};
use crate::interp::InterpolatingFunction;
use crate::limited::LimitedFunction;
use crate::piecewise::PiecewiseFunction;

const WIDTH_EPSILON: f64 = 1e-9;

/// One regime of a link result: the cost piece plus the time spent on the
/// first operand as a linear function of total time.
#[derive(Clone, Debug)]
pub struct LinkedPiece {
    pub function: LimitedFunction,
    pub parent_time: LinearFunction,
}

// Shape classification for the link cases.  Flat pieces and point domains
// both behave like constants: spending extra time on them never pays.
enum Shape {
    Const { duration: f64, value: f64 },
    Lin(LinearFunction),
    Hyp(HyperbolicFunction),
}

fn shape(piece: &LimitedFunction) -> Shape {
    if piece.width() < WIDTH_EPSILON {
        return Shape::Const { duration: piece.min_x, value: piece.eval(piece.min_x) };
    }
    match piece.function {
        HypOrLin::Constant(c) => Shape::Const { duration: piece.min_x, value: c },
        HypOrLin::Linear(lin) if lin.d.abs() < WIDTH_EPSILON => {
            Shape::Const { duration: piece.min_x, value: lin.c }
        }
        HypOrLin::Linear(lin) => Shape::Lin(lin),
        HypOrLin::Hyperbolic(hyp) => Shape::Hyp(hyp),
    }
}

fn push(out: &mut Vec<LinkedPiece>, lo: f64, hi: f64, function: HypOrLin, parent: LinearFunction) {
    if hi - lo > WIDTH_EPSILON {
        out.push(LinkedPiece {
            function: LimitedFunction::new(lo, hi, function),
            parent_time: parent,
        });
    }
}

/// Parent-time map "all extra time goes to the first operand": `t₁ = t − t₂`.
fn parent_moves(fixed_second: f64) -> LinearFunction {
    LinearFunction::new(1.0, 0.0, -fixed_second)
}

/// Parent-time map "first operand pinned at `t₁`".
fn parent_pinned(t1: f64) -> LinearFunction {
    LinearFunction::new(0.0, 0.0, t1)
}

/// Link two pieces; returns one to three regimes covering the Minkowski sum
/// of the domains, each monotone non-increasing.
pub fn link_pieces(f: &LimitedFunction, g: &LimitedFunction) -> Vec<LinkedPiece> {
    let (f0, f1) = (f.min_x, f.max_x);
    let (g0, g1) = (g.min_x, g.max_x);
    let lo = f0 + g0;
    let hi = f1 + g1;

    let mut out = Vec::with_capacity(3);

    match (shape(f), shape(g)) {
        (Shape::Const { duration: tf, value: yf }, Shape::Const { duration: tg, value: yg }) => {
            out.push(LinkedPiece {
                function: LimitedFunction::constant(tf + tg, yf + yg),
                parent_time: parent_pinned(tf),
            });
        }
        (Shape::Const { duration: tf, value: yf }, _) => {
            let mut shifted = *g;
            shifted.shift(tf);
            shifted.offset(yf);
            out.push(LinkedPiece { function: shifted, parent_time: parent_pinned(tf) });
        }
        (_, Shape::Const { duration: tg, value: yg }) => {
            let mut shifted = *f;
            shifted.shift(tg);
            shifted.offset(yg);
            out.push(LinkedPiece { function: shifted, parent_time: parent_moves(tg) });
        }
        (Shape::Lin(lf), Shape::Lin(lg)) => {
            if lf.d <= lg.d {
                // f is steeper: it soaks up time first.
                push(
                    &mut out,
                    lo,
                    f1 + g0,
                    LinearFunction::new(lf.d, lo, lf.eval(f0) + lg.eval(g0)).into(),
                    parent_moves(g0),
                );
                push(
                    &mut out,
                    f1 + g0,
                    hi,
                    LinearFunction::new(lg.d, f1 + g0, lf.eval(f1) + lg.eval(g0)).into(),
                    parent_pinned(f1),
                );
            } else {
                push(
                    &mut out,
                    lo,
                    f0 + g1,
                    LinearFunction::new(lg.d, lo, lf.eval(f0) + lg.eval(g0)).into(),
                    parent_pinned(f0),
                );
                push(
                    &mut out,
                    f0 + g1,
                    hi,
                    LinearFunction::new(lf.d, f0 + g1, lf.eval(f0) + lg.eval(g1)).into(),
                    parent_moves(g1),
                );
            }
        }
        (Shape::Lin(lf), Shape::Hyp(hg)) => {
            // Time flows into the hyperbola while it is steeper than the line.
            let t_match = hg.b + (2.0 * hg.a / (-lf.d)).cbrt();
            let tgm = t_match.clamp(g0, g1);
            push(
                &mut out,
                lo,
                f0 + tgm,
                HyperbolicFunction::new(hg.a, hg.b + f0, hg.c + lf.eval(f0)).into(),
                parent_pinned(f0),
            );
            push(
                &mut out,
                f0 + tgm,
                f1 + tgm,
                LinearFunction::new(lf.d, f0 + tgm, lf.eval(f0) + hg.eval(tgm)).into(),
                parent_moves(tgm),
            );
            push(
                &mut out,
                f1 + tgm,
                hi,
                HyperbolicFunction::new(hg.a, hg.b + f1, hg.c + lf.eval(f1)).into(),
                parent_pinned(f1),
            );
        }
        (Shape::Hyp(hf), Shape::Lin(lg)) => {
            let t_match = hf.b + (2.0 * hf.a / (-lg.d)).cbrt();
            let tfm = t_match.clamp(f0, f1);
            push(
                &mut out,
                lo,
                tfm + g0,
                HyperbolicFunction::new(hf.a, hf.b + g0, hf.c + lg.eval(g0)).into(),
                parent_moves(g0),
            );
            push(
                &mut out,
                tfm + g0,
                tfm + g1,
                LinearFunction::new(lg.d, tfm + g0, hf.eval(tfm) + lg.eval(g0)).into(),
                parent_pinned(tfm),
            );
            push(
                &mut out,
                tfm + g1,
                hi,
                HyperbolicFunction::new(hf.a, hf.b + g1, hf.c + lg.eval(g1)).into(),
                parent_moves(g1),
            );
        }
        (Shape::Hyp(hf), Shape::Hyp(hg)) => {
            let cbf = hf.a.cbrt();
            let cbg = hg.a.cbrt();
            let s = cbf + cbg;
            let r_f = cbf / s;
            let r_g = cbg / s;
            let b_sum = hf.b + hg.b;

            // x positions where the matched allocation hits each domain bound.
            let x_lo_f = b_sum + (f0 - hf.b) / r_f;
            let x_lo_g = b_sum + (g0 - hg.b) / r_g;
            let x_hi_f = b_sum + (f1 - hf.b) / r_f;
            let x_hi_g = b_sum + (g1 - hg.b) / r_g;

            let x_lo = x_lo_f.max(x_lo_g).max(lo);
            let x_hi = x_hi_f.min(x_hi_g).min(hi);

            let f_pinned_low = x_lo_f >= x_lo_g;
            let f_pinned_high = x_hi_f <= x_hi_g;

            let left = |out: &mut Vec<LinkedPiece>, until: f64| {
                if f_pinned_low {
                    push(
                        out,
                        lo,
                        until,
                        HyperbolicFunction::new(hg.a, hg.b + f0, hg.c + hf.eval(f0)).into(),
                        parent_pinned(f0),
                    );
                } else {
                    push(
                        out,
                        lo,
                        until,
                        HyperbolicFunction::new(hf.a, hf.b + g0, hf.c + hg.eval(g0)).into(),
                        parent_moves(g0),
                    );
                }
            };
            let right = |out: &mut Vec<LinkedPiece>, from: f64| {
                if f_pinned_high {
                    push(
                        out,
                        from,
                        hi,
                        HyperbolicFunction::new(hg.a, hg.b + f1, hg.c + hf.eval(f1)).into(),
                        parent_pinned(f1),
                    );
                } else {
                    push(
                        out,
                        from,
                        hi,
                        HyperbolicFunction::new(hf.a, hf.b + g1, hf.c + hg.eval(g1)).into(),
                        parent_moves(g1),
                    );
                }
            };

            if x_lo <= x_hi + WIDTH_EPSILON {
                left(&mut out, x_lo);
                push(
                    &mut out,
                    x_lo.max(lo),
                    x_hi.min(hi),
                    HyperbolicFunction::new(s * s * s, b_sum, hf.c + hg.c).into(),
                    LinearFunction::new(r_f, b_sum, hf.b),
                );
                right(&mut out, x_hi);
            } else {
                // Matched regime empty: the boundary regimes meet at a corner.
                let mid = if f_pinned_low { f0 + g1 } else { f1 + g0 };
                left(&mut out, mid);
                right(&mut out, mid);
            }
        }
    }

    if out.is_empty() {
        // Every regime degenerate: the Minkowski sum is a single point.
        out.push(LinkedPiece {
            function: LimitedFunction::constant(lo, f.eval(f0) + g.eval(g0)),
            parent_time: parent_pinned(f0),
        });
    }

    out
}

/// Lower-envelope a set of candidate regimes into a piecewise cost plus the
/// assembled parent-time delta.
pub fn envelope_with_parents(
    candidates: &[LinkedPiece],
) -> (PiecewiseFunction, InterpolatingFunction) {
    let functions: Vec<LimitedFunction> = candidates.iter().map(|c| c.function).collect();
    let (cost, sources) = lower_envelope_indexed(&functions);

    let mut delta = InterpolatingFunction::new();
    for (piece, &src) in cost.pieces.iter().zip(&sources) {
        let candidate = &candidates[src as usize];
        // Past the candidate's own domain the allocation freezes at its max.
        let cap = candidate.function.max_x;
        delta.push(piece.min_x, candidate.parent_time.eval(piece.min_x.min(cap)));
        if piece.max_x > piece.min_x {
            delta.push(piece.max_x, candidate.parent_time.eval(piece.max_x.min(cap)));
        }
    }

    (cost, delta)
}

/// Link a label cost with an edge trade-off: the relaxation step of the
/// functional Pareto search.
///
/// Returns the new cost (total time at the head node ↦ total consumption)
/// and the delta mapping total time back to the arrival time at the tail.
pub fn link_tradeoff(
    cost: &PiecewiseFunction,
    edge: &LimitedFunction,
) -> (PiecewiseFunction, InterpolatingFunction) {
    // Constant edges shift the whole front; no envelope needed.
    if edge.width() < WIDTH_EPSILON {
        if let HypOrLin::Constant(consumption) = edge.function {
            let duration = edge.min_x;
            let mut linked = cost.clone();
            linked.shift(duration);
            linked.offset(consumption);

            let mut delta = InterpolatingFunction::new();
            delta.push(linked.min_x(), cost.min_x());
            if linked.max_x() > linked.min_x() {
                delta.push(linked.max_x(), cost.max_x());
            }
            return (linked, delta);
        }
    }

    let mut candidates = Vec::with_capacity(cost.pieces.len() * 3);
    for piece in &cost.pieces {
        candidates.extend(link_pieces(piece, edge));
    }
    envelope_with_parents(&candidates)
}
