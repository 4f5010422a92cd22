//! `watt-search` — the label-setting search machinery.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`queue`]     | `MinIdQueue` — indexed binary heap with increase-key       |
//! | [`labels`]    | `NodeLabels` — per-node unsettled/settled label lists      |
//! | [`policy`]    | label types and dominance policies (ε-lex, functional)     |
//! | [`potential`] | `ZeroPotentials`, `LandmarkPotentials` (ALT)               |
//! | [`dijkstra`]  | scalar and bidirectional fastest-path searches             |
//! | [`mc`]        | the shared search loop + multi-criteria contexts           |
//! | [`fp`]        | functional Pareto contexts                                 |
//! | [`charger`]   | charging profiles and the charging composition             |
//! | [`charge`]    | MCC / FPC / FPC-profile variants                           |

pub mod charge;
pub mod charger;
pub mod dijkstra;
pub mod fp;
pub mod labels;
pub mod mc;
pub mod policy;
pub mod potential;
pub mod queue;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use charge::{FpcContext, MccContext, CHARGING_PENALTY, SAMPLE_RESOLUTION};
pub use charger::{ChargerIndex, ChargingFunction};
pub use dijkstra::{BiDijkstra, ScalarDijkstra};
pub use fp::{FpAStarContext, FpDijkstraContext};
pub use labels::NodeLabels;
pub use mc::{run_search, McAStarContext, McDijkstraContext, SearchPolicy};
pub use policy::{DominancePolicy, PairLabel, PairPolicy, SearchLabel, TradeoffLabel, TradeoffPolicy};
pub use potential::{LandmarkPotentials, NodePotentials, ZeroPotentials};
pub use queue::{IdKeyPair, MinIdQueue};
