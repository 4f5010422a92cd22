//! `watt-core` — foundational types for the `watt` EV routing engine.
//!
//! This crate is a dependency of every other `watt-*` crate.  It intentionally
//! has no `watt-*` dependencies and a single external one (`tracing`).
//! Error enums live in the crates that produce them.
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`fixed`]   | `Fixed` — millisecond / deci-mWh scale integer weights    |
//! | [`ids`]     | `NodeId`, `EdgeId`                                        |
//! | [`coord`]   | `Coordinate`, haversine distance, bearing                 |
//! | [`options`] | process-wide env-var options (`CHARGE_TAIL_*`)            |
//! | [`stats`]   | thread-local statistics counters                          |
//! | [`timer`]   | `TimedLogger` for preprocessing phases                    |

pub mod coord;
pub mod fixed;
pub mod ids;
pub mod options;
pub mod stats;
pub mod timer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::Coordinate;
pub use fixed::Fixed;
pub use ids::{EdgeId, NodeId};
pub use options::Options;
pub use stats::StatsEvent;
pub use timer::TimedLogger;
