//! `watt-func` — the trade-off function algebra.
//!
//! Every edge of an EV road graph admits a continuous family of
//! speed/consumption trade-offs: drive faster and spend more energy, or
//! slower and spend less.  This crate provides the function machinery the
//! search layer is built on.
//!
//! # Crate layout
//!
//! | Module           | Contents                                               |
//! |------------------|--------------------------------------------------------|
//! | [`hyplin`]       | `LinearFunction`, `HyperbolicFunction`, `HypOrLin`     |
//! | [`limited`]      | `LimitedFunction` — domain-limited piece (inf/clamp)   |
//! | [`piecewise`]    | `PiecewiseFunction` — sorted decreasing Pareto front   |
//! | [`interp`]       | `InterpolatingFunction` — piecewise-linear samples     |
//! | [`roots`]        | closed-form polynomial solvers, degrees 1–4            |
//! | [`intersection`] | pairwise function intersection                         |
//! | [`envelope`]     | plane-sweep lower envelope                             |
//! | [`link`]         | series composition of trade-off functions              |

pub mod envelope;
pub mod error;
pub mod hyplin;
pub mod interp;
pub mod intersection;
pub mod limited;
pub mod link;
pub mod piecewise;
pub mod roots;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::FuncError;
pub use hyplin::{HypOrLin, HyperbolicFunction, LinearFunction};
pub use interp::InterpolatingFunction;
pub use limited::LimitedFunction;
pub use link::{link_pieces, link_tradeoff, LinkedPiece};
pub use piecewise::PiecewiseFunction;
