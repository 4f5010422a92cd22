//! Thread-local statistics counters.
//!
//! The search hot path bumps plain `Cell` counters — no atomics, no locks.
//! Each thread owns its own sink, created on first access.  When
//! `CHARGE_TAIL_STATISTICS` is enabled a summary is emitted through
//! `tracing` every 10,000 recorded events so long-running queries can be
//! observed without instrumentation rebuilds.

use std::cell::Cell;
use std::fmt::Write as _;

use crate::Options;

/// Countable search events.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(usize)]
pub enum StatsEvent {
    QueuePush = 0,
    QueuePop,
    QueueIncreaseKey,
    QueueDecreaseKey,
    LabelPush,
    LabelPop,
    LabelMaxUnsettled,
    LabelMaxSettled,
    LabelCleanup,
    DijkstraRelax,
    DijkstraPrune,
    DijkstraConstraintClip,
    Domination,
    Intersection,
    NumericFailure,
}

const NUM_EVENTS: usize = StatsEvent::NumericFailure as usize + 1;

const EVENT_NAMES: [&str; NUM_EVENTS] = [
    "QUEUE_PUSH",
    "QUEUE_POP",
    "QUEUE_INCREASE_KEY",
    "QUEUE_DECREASE_KEY",
    "LABEL_PUSH",
    "LABEL_POP",
    "LABEL_MAX_NUM_UNSETTLED",
    "LABEL_MAX_NUM_SETTLED",
    "LABEL_CLEANUP",
    "DIJKSTRA_RELAX",
    "DIJKSTRA_PARENT_PRUNE",
    "DIJKSTRA_CONSTRAINT_CLIP",
    "DOMINATION",
    "INTERSECTION",
    "NUMERIC_FAILURE",
];

struct Sink {
    counters: [Cell<u64>; NUM_EVENTS],
    accesses: Cell<u64>,
    tail: bool,
}

impl Sink {
    fn new() -> Sink {
        Sink {
            counters: std::array::from_fn(|_| Cell::new(0)),
            accesses: Cell::new(0),
            tail: Options::get().tail_statistics,
        }
    }

    fn bump_access(&self) {
        if !self.tail {
            return;
        }
        let n = self.accesses.get() + 1;
        if n >= 10_000 {
            self.accesses.set(0);
            tracing::info!(target: "watt::stats", "{}", self.render());
        } else {
            self.accesses.set(n);
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (name, counter) in EVENT_NAMES.iter().zip(&self.counters) {
            let _ = writeln!(out, "{name}: {}", counter.get());
        }
        out
    }
}

thread_local! {
    static SINK: Sink = Sink::new();
}

/// Increment the event counter by one.
#[inline]
pub fn count(event: StatsEvent) {
    SINK.with(|s| {
        let cell = &s.counters[event as usize];
        cell.set(cell.get() + 1);
        s.bump_access();
    });
}

/// Record a high-water mark for the event.
#[inline]
pub fn max(event: StatsEvent, value: u64) {
    SINK.with(|s| {
        let cell = &s.counters[event as usize];
        cell.set(cell.get().max(value));
    });
}

/// Add `value` to the event counter.
#[inline]
pub fn sum(event: StatsEvent, value: u64) {
    SINK.with(|s| {
        let cell = &s.counters[event as usize];
        cell.set(cell.get() + value);
    });
}

/// Current value of the event counter on this thread.
pub fn get(event: StatsEvent) -> u64 {
    SINK.with(|s| s.counters[event as usize].get())
}

/// Zero all counters on this thread.
pub fn reset() {
    SINK.with(|s| {
        for cell in &s.counters {
            cell.set(0);
        }
        s.accesses.set(0);
    });
}

/// Human-readable dump of all counters on this thread.
pub fn summary() -> String {
    SINK.with(|s| s.render())
}
