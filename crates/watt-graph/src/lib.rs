//! `watt-graph` — road network storage and preprocessing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`csr`]       | `CsrGraph<W>` — static CSR adjacency, `invert`, lookup   |
//! | [`dynamic`]   | `DynamicGraph<W>` — mutable graph for preprocessing      |
//! | [`transform`] | trade-off graph → duration/consumption/sampled graphs    |
//! | [`turn`]      | line-graph expansion with turn-cost models               |
//! | [`files`]     | binary on-disk graph directory                           |
//! | [`nearest`]   | nearest-node spatial index (R-tree)                      |
//! | [`error`]     | `GraphError`, `GraphResult<T>`                           |

pub mod csr;
pub mod dynamic;
pub mod error;
pub mod files;
pub mod nearest;
pub mod transform;
pub mod turn;

#[cfg(test)]
mod tests;

use watt_core::Fixed;
use watt_func::LimitedFunction;

// ── Graph aliases ─────────────────────────────────────────────────────────────

/// The input graph: every edge carries a duration/consumption trade-off.
pub type TradeoffGraph = csr::CsrGraph<LimitedFunction>;

/// Scalar graph of fastest edge durations.
pub type DurationGraph = csr::CsrGraph<Fixed>;

/// Scalar graph of cheapest edge consumptions.
pub type ConsumptionGraph = csr::CsrGraph<Fixed>;

/// Multi-edge graph of `(duration, consumption)` samples.
pub type SampledGraph = csr::CsrGraph<(Fixed, Fixed)>;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csr::{CsrGraph, Edge};
pub use dynamic::DynamicGraph;
pub use error::{GraphError, GraphResult};
pub use nearest::NearestIndex;
pub use turn::TurnCostModel;
