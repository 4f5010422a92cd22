//! The HTTP layer: `GET /route` and `GET /nearest`.
//!
//! Responses are JSON.  Missing or malformed parameters, unknown
//! algorithms, and "no route" answer with HTTP 400 and `{"error": "..."}`;
//! internal failures answer 500.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use watt_core::Coordinate;
use watt_func::{HypOrLin, LimitedFunction};

use crate::engine::{Algorithm, Engine};
use crate::error::EngineError;
use crate::result::RouteResult;

// ── JSON rendering ────────────────────────────────────────────────────────────

fn tradeoff_to_json(piece: &LimitedFunction) -> Value {
    let (a, b, c, d) = match piece.function {
        HypOrLin::Constant(c) => (0.0, 0.0, c, 0.0),
        HypOrLin::Linear(lin) => (0.0, lin.b, lin.c, lin.d),
        HypOrLin::Hyperbolic(hyp) => (hyp.a, hyp.b, hyp.c, 0.0),
    };
    json!({
        "min_duration": piece.min_x,
        "max_duration": piece.max_x,
        "a": a,
        "b": b,
        "c": c,
        "d": d,
    })
}

fn route_to_json(route: &RouteResult) -> Value {
    let geometry: Vec<Value> = route
        .geometry
        .iter()
        .map(|c| {
            let (lon, lat) = c.to_floating();
            json!([lon, lat])
        })
        .collect();
    let search_space: Vec<Value> = route
        .search_space
        .iter()
        .map(|node| {
            let (lon, lat) = node.coordinate.to_floating();
            json!({
                "id": node.id,
                "coordinate": [lon, lat],
                "num_settled_labels": node.num_settled_labels,
                "is_charging_station": node.is_charging_station,
            })
        })
        .collect();

    json!({
        "path": route.path,
        "durations": route.durations,
        "consumptions": route.consumptions,
        "tradeoff": route.tradeoff.pieces.iter().map(tradeoff_to_json).collect::<Vec<_>>(),
        "heights": route.heights,
        "lengths": route.lengths,
        "max_speeds": route.max_speeds,
        "geometry": geometry,
        "search_space": search_space,
    })
}

pub fn routes_to_json(start: u32, target: u32, routes: &[RouteResult]) -> Value {
    json!({
        "start": start,
        "target": target,
        "routes": routes.iter().map(route_to_json).collect::<Vec<_>>(),
    })
}

// ── error mapping ─────────────────────────────────────────────────────────────

fn error_response(code: StatusCode, message: impl std::fmt::Display) -> Response {
    (code, Json(json!({ "error": message.to_string() }))).into_response()
}

fn engine_error_response(error: EngineError) -> Response {
    let code = match error {
        EngineError::Internal(_) | EngineError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(code, error)
}

// ── /route ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteParams {
    algorithm: Option<String>,
    start: Option<u32>,
    target: Option<u32>,
    search_space: Option<String>,
}

/// Parse the optional `search_space` flag; only `true`/`false` are valid.
pub(crate) fn parse_search_space(value: Option<&str>) -> Result<bool, EngineError> {
    match value {
        None => Ok(false),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(EngineError::InvalidParameter {
            name: "search_space",
            value: other.to_string(),
        }),
    }
}

async fn handle_route(
    State(engine): State<Arc<Engine>>,
    Query(params): Query<RouteParams>,
) -> Response {
    let Some(algorithm) = params.algorithm else {
        return engine_error_response(EngineError::MissingParameter("algorithm"));
    };
    let Some(start) = params.start else {
        return engine_error_response(EngineError::MissingParameter("start"));
    };
    let Some(target) = params.target else {
        return engine_error_response(EngineError::MissingParameter("target"));
    };

    let algorithm = match Algorithm::from_str(&algorithm) {
        Ok(algorithm) => algorithm,
        Err(error) => return engine_error_response(error),
    };
    let search_space = match parse_search_space(params.search_space.as_deref()) {
        Ok(flag) => flag,
        Err(error) => return engine_error_response(error),
    };

    match engine.route(algorithm, start, target, search_space) {
        Ok(routes) if routes.is_empty() => engine_error_response(EngineError::NoRoute),
        Ok(routes) => Json(routes_to_json(start, target, &routes)).into_response(),
        Err(error) => engine_error_response(error),
    }
}

// ── /nearest ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NearestParams {
    lon: Option<f64>,
    lat: Option<f64>,
}

async fn handle_nearest(
    State(engine): State<Arc<Engine>>,
    Query(params): Query<NearestParams>,
) -> Response {
    let Some(lon) = params.lon else {
        return engine_error_response(EngineError::MissingParameter("lon"));
    };
    let Some(lat) = params.lat else {
        return engine_error_response(EngineError::MissingParameter("lat"));
    };

    match engine.nearest(Coordinate::from_floating(lon, lat)) {
        Some(nearest) => {
            let (lon, lat) = nearest.coordinate.to_floating();
            Json(json!({ "id": nearest.id, "coordinate": [lon, lat] })).into_response()
        }
        None => error_response(StatusCode::BAD_REQUEST, "empty graph"),
    }
}

// ── router & server ───────────────────────────────────────────────────────────

pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/route", get(handle_route))
        .route("/nearest", get(handle_nearest))
        .with_state(engine)
}

/// Serve until the process is terminated.
pub async fn serve(engine: Arc<Engine>, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("listening on port {port}");
    axum::serve(listener, router(engine)).await
}
