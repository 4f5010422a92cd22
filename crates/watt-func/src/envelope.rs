//! Lower envelopes: the pointwise minimum of a family of functions.
//!
//! # Plane sweep
//!
//! The functional envelope is a Bentley–Ottmann-style sweep over `k` limited
//! functions.  Events are `Begin`, `End`, and `Intersection`, ordered by
//! `(x, type, y)` with ends sorting before begins at a tied x so a segment
//! that stops exactly where another starts never counts as overlapping.
//! Intersections are only computed lazily: between the current minimum and a
//! newcomer, and — when the minimum changes — between the new minimum and
//! every active segment.  An `n×n` bitmap prevents checking the same pair
//! twice, bounding the event count by `O(k²)` for this algebra.
//!
//! Complexity `O((k + I) log(k + I))` with `I ≤ 4k²` intersections.
//!
//! The scalar 2-D envelope (`pareto_retain`) used by the multi-criteria
//! label cleanup lives here as well: sort by the pair, drop dominated
//! successors in one scan.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use watt_core::{stats, StatsEvent};

use crate::hyplin::HypOrLin;
use crate::intersection::intersect_limited;
use crate::limited::LimitedFunction;
use crate::piecewise::PiecewiseFunction;

/// Lookahead used to compare segments immediately right of an event.
const EPSILON: f64 = 0.001;
/// Two events closer than this in x are treated as the same sweep position.
const SAME_X_EPSILON: f64 = 0.000_01;

// ── events ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Debug)]
enum EventKind {
    // Order matters for tie breaking at equal x.
    End = 0,
    Begin = 1,
    Intersection = 2,
}

#[derive(Copy, Clone, Debug)]
struct SweepEvent {
    x: f64,
    y: f64,
    kind: EventKind,
    first: u32,
    /// Second segment of an intersection event; unused otherwise.
    second: u32,
}

impl PartialEq for SweepEvent {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.kind == other.kind
            && self.first == other.first
            && self.second == other.second
    }
}

impl Eq for SweepEvent {}

impl Ord for SweepEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then((self.kind as u8).cmp(&(other.kind as u8)))
            .then(self.y.total_cmp(&other.y))
    }
}

impl PartialOrd for SweepEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── sweep ─────────────────────────────────────────────────────────────────────

const NO_MIN: u32 = u32::MAX;

/// Compute the lower envelope of `functions`.
///
/// Returns the envelope as a monotone-decreasing [`PiecewiseFunction`]
/// together with the index of the source function behind each emitted piece.
pub fn lower_envelope_indexed(functions: &[LimitedFunction]) -> (PiecewiseFunction, Vec<u32>) {
    let mut pieces = PiecewiseFunction::default();
    let mut sources = Vec::new();

    let num_functions = functions.len();
    if num_functions == 0 {
        return (pieces, sources);
    }

    let mut active: FxHashSet<u32> = FxHashSet::default();
    let mut events: BinaryHeap<std::cmp::Reverse<SweepEvent>> = BinaryHeap::new();

    let mut current_x = f64::NEG_INFINITY;
    let mut prev_x = f64::NEG_INFINITY;
    let mut min_index = NO_MIN;
    let mut prev_min_index = NO_MIN;

    for (index, function) in functions.iter().enumerate() {
        events.push(std::cmp::Reverse(SweepEvent {
            x: function.min_x,
            y: function.eval(function.min_x),
            kind: EventKind::Begin,
            first: index as u32,
            second: 0,
        }));
    }

    let mut was_checked = vec![false; num_functions * num_functions];

    let mut emit = |min_x: f64, max_x: f64, index: u32, final_piece: bool| {
        sources.push(index);
        let function = &functions[index as usize];
        if min_x > function.max_x {
            // The source's own domain ended earlier; what remains visible is
            // its clamped constant tail.
            let max_x = if final_piece { min_x } else { max_x };
            pieces.push_piece(LimitedFunction::new(
                min_x,
                max_x,
                HypOrLin::Constant(function.min_y()),
            ));
        } else {
            let max_x = if final_piece { function.max_x } else { max_x.min(function.max_x) };
            pieces.push_piece(LimitedFunction::new(min_x, max_x.max(min_x), function.function));
        }
    };

    // Enqueue the intersections of a segment pair, unless already checked.
    macro_rules! insert_intersection {
        ($first:expr, $second:expr) => {{
            let first = $first as usize;
            let second = $second as usize;
            if !was_checked[first * num_functions + second] {
                was_checked[first * num_functions + second] = true;
                was_checked[second * num_functions + first] = true;

                stats::count(StatsEvent::Intersection);

                let mut crossings = Vec::with_capacity(4);
                intersect_limited(&functions[first], &functions[second], &mut crossings);
                for x in crossings {
                    // Keep future events, and events at the current x in case
                    // the sweep starts on an intersection.
                    if x >= current_x {
                        events.push(std::cmp::Reverse(SweepEvent {
                            x,
                            y: functions[first].eval(x),
                            kind: EventKind::Intersection,
                            first: first as u32,
                            second: second as u32,
                        }));
                    }
                }
            }
        }};
    }

    while let Some(std::cmp::Reverse(event)) = events.pop() {
        // Collapse duplicate events.
        while events.peek().is_some_and(|e| e.0 == event) {
            events.pop();
        }

        let mut new_min_index = min_index;

        match event.kind {
            EventKind::Intersection => {
                current_x = event.x;

                // Only relevant if the current minimum is involved.
                if event.first == min_index {
                    let min_y = functions[min_index as usize].eval(current_x + EPSILON);
                    let new_y = functions[event.second as usize].eval(current_x + EPSILON);
                    if new_y < min_y {
                        new_min_index = event.second;
                    }
                } else if event.second == min_index {
                    let min_y = functions[min_index as usize].eval(current_x + EPSILON);
                    let new_y = functions[event.first as usize].eval(current_x + EPSILON);
                    if new_y < min_y {
                        new_min_index = event.first;
                    }
                }
            }
            EventKind::Begin => {
                current_x = event.x;

                let index = event.first;
                let function = &functions[index as usize];
                active.insert(index);
                events.push(std::cmp::Reverse(SweepEvent {
                    x: function.max_x,
                    y: function.min_y(),
                    kind: EventKind::End,
                    first: index,
                    second: 0,
                }));

                if min_index != NO_MIN {
                    if functions[index as usize].eval(current_x + EPSILON)
                        < functions[min_index as usize].eval(current_x + EPSILON)
                    {
                        new_min_index = index;
                    } else {
                        insert_intersection!(min_index, index);
                    }
                } else {
                    new_min_index = index;
                }
            }
            EventKind::End => {
                current_x = event.x;
                // The minimum may keep pointing at the ended segment: its
                // clamped constant tail stays visible, and the crossings of
                // that tail with every other segment are already event
                // candidates via `intersect_limited`.
                active.remove(&event.first);
            }
        }

        if min_index != new_min_index {
            min_index = new_min_index;

            let others: Vec<u32> =
                active.iter().copied().filter(|&other| other != min_index).collect();
            for other in others {
                insert_intersection!(min_index, other);
            }
        }

        // Emit only once all events at this x coordinate are processed.
        let x_done = events
            .peek()
            .map_or(true, |e| e.0.x > current_x + SAME_X_EPSILON);
        if x_done && prev_min_index != min_index && prev_x + SAME_X_EPSILON < current_x {
            // The segment from -inf to the first begin has no source.
            if prev_min_index != NO_MIN {
                emit(prev_x, current_x, prev_min_index, false);
            }
            prev_min_index = min_index;
            prev_x = current_x;
        }
    }

    if min_index != NO_MIN {
        emit(prev_x, f64::INFINITY, min_index, true);
    }

    (pieces, sources)
}

/// Lower envelope without the source indices.
pub fn lower_envelope(functions: &[LimitedFunction]) -> PiecewiseFunction {
    lower_envelope_indexed(functions).0
}

// ── 2-D Pareto envelope ───────────────────────────────────────────────────────

/// Reduce `values` to its Pareto front under the 2-D key: after sorting by
/// the key, an element is dropped when its predecessor on the front is at
/// least as good in both components.
pub fn pareto_retain<T, K>(values: &mut Vec<T>, key: K)
where
    K: Fn(&T) -> (watt_core::Fixed, watt_core::Fixed),
{
    values.sort_by(|lhs, rhs| key(lhs).cmp(&key(rhs)));

    let mut current: Option<(watt_core::Fixed, watt_core::Fixed)> = None;
    values.retain(|value| {
        let k = key(value);
        match current {
            Some((x, y)) if x <= k.0 && y <= k.1 => false,
            _ => {
                current = Some(k);
                true
            }
        }
    });
}
