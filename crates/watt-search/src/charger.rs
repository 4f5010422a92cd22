//! Charging stations and the charging composition.
//!
//! # Charging model
//!
//! A station's SoC-over-time profile is piecewise linear and concave: the
//! nominal rate up to 80 % of capacity, half rate to 95 %, quarter rate to
//! full — the usual constant-current/constant-voltage taper, linearised.
//! The profile is monotone non-decreasing and clamps at capacity.
//!
//! # Composition
//!
//! `link_charging` composes an arrival front `F` (total time ↦ consumption,
//! battery full at departure of the source) with a charging profile: for
//! every front piece and every profile segment, the optimal arrival time
//! matches the front's marginal saving against the segment's charging rate
//! (drive slower while that saves more energy per second than the plug
//! delivers).  Each pair yields one linear candidate (charging in a linear
//! segment recovers energy linearly in time); the lower envelope of all
//! candidates is the composed front.  Its delta maps total time back to the
//! arrival time at the station, which path reconstruction uses to split
//! driving from charging.

use watt_func::link::{envelope_with_parents, LinkedPiece};
use watt_func::{
    HypOrLin, InterpolatingFunction, LimitedFunction, LinearFunction, PiecewiseFunction,
};

// ── charging function ─────────────────────────────────────────────────────────

/// One linear segment of a charging profile.
#[derive(Copy, Clone, Debug)]
pub struct ChargeSegment {
    pub soc_lo: f64,
    pub soc_hi: f64,
    /// Charging rate on this segment in Wh per second.
    pub rate: f64,
}

/// Concave SoC-over-time profile of one station.
#[derive(Clone, Debug)]
pub struct ChargingFunction {
    /// `(charging seconds, SoC in Wh)` breakpoints, starting at `(0, 0)`.
    points: Vec<(f64, f64)>,
}

impl ChargingFunction {
    /// Build the linearised profile for a station with nominal `rate_watts`
    /// and a battery of `capacity_wh`.
    pub fn new(rate_watts: f64, capacity_wh: f64) -> Self {
        let secs_for = |wh: f64, watts: f64| wh * 3600.0 / watts;

        let fast_to = 0.8 * capacity_wh;
        let taper_to = 0.95 * capacity_wh;

        let t0 = secs_for(fast_to, rate_watts);
        let t1 = t0 + secs_for(taper_to - fast_to, rate_watts / 2.0);
        let t2 = t1 + secs_for(capacity_wh - taper_to, rate_watts / 4.0);

        Self {
            points: vec![(0.0, 0.0), (t0, fast_to), (t1, taper_to), (t2, capacity_wh)],
        }
    }

    /// Full-battery SoC.
    pub fn capacity(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.1)
    }

    fn soc_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        for pair in self.points.windows(2) {
            let (t0, s0) = pair[0];
            let (t1, s1) = pair[1];
            if t <= t1 {
                return s0 + (s1 - s0) * (t - t0) / (t1 - t0);
            }
        }
        self.capacity()
    }

    fn time_at(&self, soc: f64) -> f64 {
        if soc <= 0.0 {
            return 0.0;
        }
        for pair in self.points.windows(2) {
            let (t0, s0) = pair[0];
            let (t1, s1) = pair[1];
            if soc <= s1 {
                return t0 + (t1 - t0) * (soc - s0) / (s1 - s0);
            }
        }
        self.points.last().map_or(0.0, |p| p.0)
    }

    /// SoC after plugging in at `soc_in` for `dt` seconds.
    pub fn charge(&self, soc_in: f64, dt: f64) -> f64 {
        self.soc_at(self.time_at(soc_in) + dt)
    }

    /// Seconds to charge from `soc_from` to `soc_to`.
    pub fn time_to(&self, soc_from: f64, soc_to: f64) -> f64 {
        (self.time_at(soc_to) - self.time_at(soc_from)).max(0.0)
    }

    /// The linear segments of the profile, cheapest-SoC first.
    pub fn segments(&self) -> Vec<ChargeSegment> {
        self.points
            .windows(2)
            .map(|pair| {
                let (t0, s0) = pair[0];
                let (t1, s1) = pair[1];
                ChargeSegment { soc_lo: s0, soc_hi: s1, rate: (s1 - s0) / (t1 - t0) }
            })
            .collect()
    }
}

// ── charger index ─────────────────────────────────────────────────────────────

/// Per-node charging stations; rate `0.0` means "not a charger".
#[derive(Clone)]
pub struct ChargerIndex {
    rates: Vec<f64>,
    functions: Vec<Option<ChargingFunction>>,
    capacity: f64,
}

impl ChargerIndex {
    pub fn new(rates: Vec<f64>, capacity_wh: f64) -> Self {
        let functions = rates
            .iter()
            .map(|&rate| (rate > 0.0).then(|| ChargingFunction::new(rate, capacity_wh)))
            .collect();
        Self { rates, functions, capacity: capacity_wh }
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    #[inline]
    pub fn has(&self, node: watt_core::NodeId) -> bool {
        self.rates.get(node.index()).is_some_and(|r| *r > 0.0)
    }

    #[inline]
    pub fn function(&self, node: watt_core::NodeId) -> Option<&ChargingFunction> {
        self.functions.get(node.index()).and_then(Option::as_ref)
    }

    pub fn rate(&self, node: watt_core::NodeId) -> f64 {
        self.rates.get(node.index()).copied().unwrap_or(0.0)
    }

    /// Number of nodes the index covers.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn num_stations(&self) -> usize {
        self.rates.iter().filter(|r| **r > 0.0).count()
    }
}

// ── composition ───────────────────────────────────────────────────────────────

const SOC_EPSILON: f64 = 1e-6;

/// Optimal arrival time on `piece` for charging at `rate`: the point where
/// the front's marginal saving drops to the plug's rate.
fn matched_arrival(piece: &LimitedFunction, rate: f64) -> f64 {
    match piece.function {
        HypOrLin::Constant(_) => piece.min_x,
        HypOrLin::Linear(lin) => {
            if -lin.d > rate {
                piece.max_x
            } else {
                piece.min_x
            }
        }
        HypOrLin::Hyperbolic(hyp) => {
            (hyp.b + (2.0 * hyp.a / rate).cbrt()).clamp(piece.min_x, piece.max_x)
        }
    }
}

/// Compose an arrival front with a charging profile.
///
/// Returns the composed front over total time (arrival + stop penalty +
/// charging) and its delta back to the arrival time, or `None` when no
/// charging option improves on arriving full enough already.
pub fn link_charging(
    cost: &PiecewiseFunction,
    charging: &ChargingFunction,
    segments: &[ChargeSegment],
    capacity: f64,
    penalty: f64,
) -> Option<(PiecewiseFunction, InterpolatingFunction)> {
    let mut candidates: Vec<LinkedPiece> = Vec::new();

    for piece in &cost.pieces {
        for segment in segments {
            let arrival = matched_arrival(piece, segment.rate);
            let soc_in = capacity - piece.eval(arrival);
            if soc_in >= segment.soc_hi - SOC_EPSILON {
                continue;
            }

            let entry_soc = soc_in.max(segment.soc_lo);
            let pre = charging.time_to(soc_in, entry_soc);
            let start = arrival + penalty + pre;
            let end = start + (segment.soc_hi - entry_soc) / segment.rate;
            if end - start < SOC_EPSILON {
                continue;
            }

            candidates.push(LinkedPiece {
                function: LimitedFunction::new(
                    start,
                    end,
                    LinearFunction::new(-segment.rate, start, capacity - entry_soc).into(),
                ),
                parent_time: LinearFunction::new(0.0, 0.0, arrival),
            });
        }
    }

    if candidates.is_empty() {
        return None;
    }

    Some(envelope_with_parents(&candidates))
}
