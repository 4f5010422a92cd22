//! `watt-server` — the query engine facade and HTTP layer.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`engine`]   | `Engine` — load a graph directory, dispatch algorithms    |
//! | [`handlers`] | one handler per algorithm, each guarding its context      |
//! | [`result`]   | `RouteResult`, annotation passes, label reconstruction    |
//! | [`http`]     | `GET /route`, `GET /nearest` (axum)                       |
//! | [`error`]    | `EngineError`                                             |

pub mod engine;
pub mod error;
pub mod handlers;
pub mod http;
pub mod result;


pub use engine::{Algorithm, Engine, NearestResult};
pub use error::EngineError;
pub use result::{RouteResult, SearchSpaceNode};
