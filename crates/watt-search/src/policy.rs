//! Dominance policies and label types.
//!
//! A policy decides when one partial solution makes another redundant.
//! Three levels:
//!
//! - scalar — plain `≤` (the scalar Dijkstra needs no label lists at all);
//! - bi-criteria ε-lex — `(duration, consumption)` pairs with slack:
//!   `(x₁,y₁) ≼ (x₂,y₂)` iff `x₁ ≤ x₂+εx ∧ y₁ ≤ y₂+εy ∧ (x₁<x₂−εx ∨ y₁<y₂−εy)`;
//! - functional — a settled front dominates a candidate on the sub-domains
//!   where it is pointwise at least as good (within the epsilons); the
//!   candidate is *clipped* to its leftmost undominated sub-domain instead
//!   of being discarded outright.

use watt_core::{stats, Fixed, NodeId, StatsEvent};
use watt_func::envelope::pareto_retain;
use watt_func::intersection::intersect_limited;
use watt_func::{InterpolatingFunction, PiecewiseFunction};

// ── label traits ──────────────────────────────────────────────────────────────

/// Minimal interface the label container needs.
pub trait SearchLabel: Clone {
    fn key(&self) -> Fixed;
    fn set_key(&mut self, key: Fixed);
}

/// A dominance policy over one label type.
pub trait DominancePolicy {
    type Label: SearchLabel;

    /// The label's key contribution before the node potential is added.
    fn cost_key(&self, label: &Self::Label) -> Fixed;

    /// Quick single-label dominance check (heap head vs. a new label).
    fn dominates(&self, lhs: &Self::Label, rhs: &Self::Label) -> bool;

    /// `true` if any settled label dominates `label` entirely.
    fn dominated_by(&self, settled: &[Self::Label], label: &Self::Label) -> bool;

    /// Clip `label` against the settled list.
    ///
    /// Returns `(dominated, modified)`: fully dominated labels report
    /// `dominated = true`; partially dominated functional labels shrink
    /// their domain and report `modified = true`.
    fn clip_dominated(&self, settled: &[Self::Label], label: &mut Self::Label) -> (bool, bool);

    /// Reduce an unsettled list to its Pareto front (point costs only).
    fn cleanup(&self, _unsettled: &mut Vec<Self::Label>) {}
}

// ── pair labels ───────────────────────────────────────────────────────────────

/// A multi-criteria label: one `(duration, consumption)` point.
#[derive(Clone, Debug)]
pub struct PairLabel {
    pub key: Fixed,
    pub duration: Fixed,
    pub consumption: Fixed,
    pub parent: NodeId,
    pub parent_entry: u32,
    /// Station this label just charged at; blocks immediate re-charging.
    pub charged_at: NodeId,
}

impl PairLabel {
    pub fn start() -> Self {
        Self {
            key: Fixed::ZERO,
            duration: Fixed::ZERO,
            consumption: Fixed::ZERO,
            parent: NodeId::INVALID,
            parent_entry: u32::MAX,
            charged_at: NodeId::INVALID,
        }
    }
}

impl SearchLabel for PairLabel {
    fn key(&self) -> Fixed {
        self.key
    }
    fn set_key(&mut self, key: Fixed) {
        self.key = key;
    }
}

/// ε-lex dominance between pairs.
pub fn epsilon_dominates_lexicographical(
    lhs: (Fixed, Fixed),
    rhs: (Fixed, Fixed),
    eps_x: Fixed,
    eps_y: Fixed,
) -> bool {
    let (x1, y1) = lhs;
    let (x2, y2) = rhs;
    x1 <= x2.saturating_add(eps_x)
        && y1 <= y2.saturating_add(eps_y)
        && (x1 < x2.saturating_sub(eps_x) || y1 < y2.saturating_sub(eps_y))
}

/// Bi-criteria ε-lex policy with a battery capacity bound.
pub struct PairPolicy {
    pub eps_x: Fixed,
    pub eps_y: Fixed,
    pub capacity: Fixed,
}

impl PairPolicy {
    pub fn new(eps_x: Fixed, eps_y: Fixed, capacity: Fixed) -> Self {
        Self { eps_x, eps_y, capacity }
    }

    /// Apply the battery constraint to a tentative cost.
    ///
    /// Consumption clamps at zero from below (recuperation cannot overfill
    /// the battery); exceeding the capacity makes the label infeasible.
    pub fn constrain(&self, duration: &mut Fixed, consumption: &mut Fixed) -> bool {
        *consumption = (*consumption).max(Fixed::ZERO);
        if *consumption > self.capacity {
            *duration = Fixed::INF;
        }
        *duration == Fixed::INF
    }
}

impl DominancePolicy for PairPolicy {
    type Label = PairLabel;

    fn cost_key(&self, label: &Self::Label) -> Fixed {
        label.duration
    }

    fn dominates(&self, lhs: &Self::Label, rhs: &Self::Label) -> bool {
        stats::count(StatsEvent::Domination);
        epsilon_dominates_lexicographical(
            (lhs.duration, lhs.consumption),
            (rhs.duration, rhs.consumption),
            self.eps_x,
            self.eps_y,
        )
    }

    fn dominated_by(&self, settled: &[Self::Label], label: &Self::Label) -> bool {
        settled.iter().any(|s| self.dominates(s, label))
    }

    // Clipping does nothing for point costs.
    fn clip_dominated(&self, settled: &[Self::Label], label: &mut Self::Label) -> (bool, bool) {
        (self.dominated_by(settled, label), false)
    }

    fn cleanup(&self, unsettled: &mut Vec<Self::Label>) {
        pareto_retain(unsettled, |label| (label.duration, label.consumption));
    }
}

// ── functional labels ─────────────────────────────────────────────────────────

/// A functional Pareto label: a full duration/consumption front plus the
/// delta used to walk back to the parent during path reconstruction.
#[derive(Clone, Debug)]
pub struct TradeoffLabel {
    pub key: Fixed,
    pub cost: PiecewiseFunction,
    pub delta: InterpolatingFunction,
    pub parent: NodeId,
    pub parent_entry: u32,
    pub charged_at: NodeId,
}

impl TradeoffLabel {
    pub fn start() -> Self {
        Self {
            key: Fixed::ZERO,
            cost: PiecewiseFunction::constant(0.0, 0.0),
            delta: InterpolatingFunction::new(),
            parent: NodeId::INVALID,
            parent_entry: u32::MAX,
            charged_at: NodeId::INVALID,
        }
    }
}

impl SearchLabel for TradeoffLabel {
    fn key(&self) -> Fixed {
        self.key
    }
    fn set_key(&mut self, key: Fixed) {
        self.key = key;
    }
}

/// Functional Pareto dominance with domain clipping.
pub struct TradeoffPolicy {
    pub eps_x: f64,
    pub eps_y: f64,
    pub capacity: f64,
}

const INTERVAL_EPSILON: f64 = 1e-6;

impl TradeoffPolicy {
    pub fn new(eps_x: f64, eps_y: f64, capacity: f64) -> Self {
        Self { eps_x, eps_y, capacity }
    }

    /// `front(x + εx) ≤ g(x) + εy`?
    #[inline]
    fn below_at(&self, front: &PiecewiseFunction, g: &PiecewiseFunction, x: f64) -> bool {
        front.eval(x + self.eps_x) <= g.eval(x) + self.eps_y
    }

    /// Intervals of `g`'s domain on which `front` dominates it, appended to
    /// `out` as `(lo, hi)` pairs (unmerged).
    fn dominated_intervals(
        &self,
        front: &PiecewiseFunction,
        g: &PiecewiseFunction,
        out: &mut Vec<(f64, f64)>,
    ) {
        stats::count(StatsEvent::Domination);

        let lo = g.min_x();
        let hi = g.max_x();

        // Sign changes of front(x+εx) − g(x) − εy happen at piece borders or
        // at crossings of the shifted front pieces with g's pieces.
        let mut cuts: Vec<f64> = vec![lo, hi];
        for piece in &g.pieces {
            cuts.push(piece.min_x);
            cuts.push(piece.max_x);
        }
        for piece in &front.pieces {
            cuts.push(piece.min_x - self.eps_x);
            cuts.push(piece.max_x - self.eps_x);
        }
        let mut crossings = Vec::with_capacity(4);
        for front_piece in &front.pieces {
            // Sign changes solve front(x+εx) − εy = g(x).
            let mut shifted = *front_piece;
            shifted.shift(-self.eps_x);
            shifted.offset(-self.eps_y);
            for g_piece in &g.pieces {
                crossings.clear();
                intersect_limited(&shifted, g_piece, &mut crossings);
                cuts.extend_from_slice(&crossings);
            }
        }

        cuts.retain(|x| *x >= lo - INTERVAL_EPSILON && *x <= hi + INTERVAL_EPSILON);
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|a, b| (*a - *b).abs() < INTERVAL_EPSILON);

        if cuts.len() <= 1 {
            // Point domain.
            if self.below_at(front, g, lo) {
                out.push((lo, hi));
            }
            return;
        }

        for pair in cuts.windows(2) {
            let mid = (pair[0] + pair[1]) / 2.0;
            if self.below_at(front, g, mid) {
                out.push((pair[0], pair[1]));
            }
        }
    }
}

/// Merge overlapping/touching intervals in place.
fn merge_intervals(intervals: &mut Vec<(f64, f64)>) {
    intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(intervals.len());
    for &(lo, hi) in intervals.iter() {
        match merged.last_mut() {
            Some(last) if lo <= last.1 + INTERVAL_EPSILON => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    *intervals = merged;
}

impl DominancePolicy for TradeoffPolicy {
    type Label = TradeoffLabel;

    fn cost_key(&self, label: &Self::Label) -> Fixed {
        Fixed::from_f64(label.cost.min_x())
    }

    fn dominates(&self, lhs: &Self::Label, rhs: &Self::Label) -> bool {
        let mut intervals = Vec::new();
        self.dominated_intervals(&lhs.cost, &rhs.cost, &mut intervals);
        merge_intervals(&mut intervals);
        covers(&intervals, rhs.cost.min_x(), rhs.cost.max_x())
    }

    fn dominated_by(&self, settled: &[Self::Label], label: &Self::Label) -> bool {
        let mut intervals = Vec::new();
        for s in settled {
            self.dominated_intervals(&s.cost, &label.cost, &mut intervals);
        }
        merge_intervals(&mut intervals);
        covers(&intervals, label.cost.min_x(), label.cost.max_x())
    }

    fn clip_dominated(&self, settled: &[Self::Label], label: &mut Self::Label) -> (bool, bool) {
        if label.cost.is_empty() {
            return (true, false);
        }
        if settled.is_empty() {
            return (false, false);
        }

        let lo = label.cost.min_x();
        let hi = label.cost.max_x();

        let mut intervals = Vec::new();
        for s in settled {
            self.dominated_intervals(&s.cost, &label.cost, &mut intervals);
        }
        merge_intervals(&mut intervals);

        if intervals.is_empty() {
            return (false, false);
        }
        if covers(&intervals, lo, hi) {
            return (true, false);
        }

        // Leftmost undominated sub-domain; anything right of it is either
        // dominated or discarded (only the leftmost part is kept).
        let mut start = lo;
        let mut end = hi;
        for &(ilo, ihi) in &intervals {
            if ilo <= start + INTERVAL_EPSILON {
                start = start.max(ihi);
            } else {
                end = ilo;
                break;
            }
        }

        if start <= lo + INTERVAL_EPSILON && end >= hi - INTERVAL_EPSILON {
            return (false, false);
        }

        label.cost.limit_from_x(start, end);
        label.delta.limit_from_x(start, end);
        label.cost.shrink_to_fit();
        label.delta.shrink_to_fit();
        (label.cost.is_empty(), true)
    }
}

/// Do the merged `intervals` cover `[lo, hi]` entirely?
fn covers(intervals: &[(f64, f64)], lo: f64, hi: f64) -> bool {
    let mut cursor = lo;
    for &(ilo, ihi) in intervals {
        if ilo > cursor + INTERVAL_EPSILON {
            return false;
        }
        cursor = cursor.max(ihi);
        if cursor >= hi - INTERVAL_EPSILON {
            return true;
        }
    }
    cursor >= hi - INTERVAL_EPSILON
}
