//! One handler per algorithm.
//!
//! A handler owns the derived graphs its search needs (minimum-duration
//! projection, reverse graph, sampled graph) and a mutable query context
//! behind a mutex: one query at a time per handler, contexts reused across
//! queries.

use std::sync::{Arc, Mutex};

use watt_core::NodeId;
use watt_graph::transform::{to_min_duration, to_sampled};
use watt_graph::{DurationGraph, SampledGraph};
use watt_search::{
    BiDijkstra, FpAStarContext, FpcContext, LandmarkPotentials, McDijkstraContext, MccContext,
    CHARGING_PENALTY, SAMPLE_RESOLUTION,
};

use crate::engine::GraphData;
use crate::error::EngineError;
use crate::result::{
    get_search_space, to_result_pairs, to_result_scalar, to_result_tradeoff, RouteResult,
};

/// Dominance epsilons shared by all query contexts: 0.1 s and 1 Wh.
const EPS_X: f64 = 0.1;
const EPS_Y: f64 = 1.0;

/// Landmark count and selection seed for the ALT potentials.
const NUM_LANDMARKS: usize = 8;
const LANDMARK_SEED: u64 = 0x5eed;

pub trait AlgorithmHandler: Send + Sync {
    fn route(
        &self,
        start: NodeId,
        target: NodeId,
        search_space: bool,
    ) -> Result<Vec<RouteResult>, EngineError>;
}

fn landmark_potentials(reverse_durations: &DurationGraph) -> LandmarkPotentials {
    LandmarkPotentials::new(reverse_durations, NUM_LANDMARKS, LANDMARK_SEED)
}

// ── fastest path ──────────────────────────────────────────────────────────────

pub struct FastestHandler {
    data: Arc<GraphData>,
    durations: DurationGraph,
    reverse_durations: DurationGraph,
    context: Mutex<BiDijkstra>,
}

impl FastestHandler {
    pub fn new(data: Arc<GraphData>) -> Self {
        let durations = to_min_duration(&data.graph);
        let reverse_durations = durations.invert();
        let context = Mutex::new(BiDijkstra::new(durations.num_nodes()));
        Self { data, durations, reverse_durations, context }
    }
}

impl AlgorithmHandler for FastestHandler {
    fn route(
        &self,
        start: NodeId,
        target: NodeId,
        _search_space: bool,
    ) -> Result<Vec<RouteResult>, EngineError> {
        let mut context = self
            .context
            .lock()
            .map_err(|_| EngineError::Internal("handler context poisoned".into()))?;

        match context.run(&self.durations, &self.reverse_durations, start, target) {
            Some((_, path)) => Ok(vec![to_result_scalar(&self.data.graph, &path)]),
            None => Ok(vec![]),
        }
    }
}

// ── multi-criteria ────────────────────────────────────────────────────────────

pub struct McHandler {
    data: Arc<GraphData>,
    sampled: SampledGraph,
    context: Mutex<McDijkstraContext>,
}

impl McHandler {
    pub fn new(data: Arc<GraphData>, capacity: f64) -> Self {
        let sampled = to_sampled(&data.graph, SAMPLE_RESOLUTION);
        let context =
            Mutex::new(McDijkstraContext::new(EPS_X, EPS_Y, capacity, sampled.num_nodes()));
        Self { data, sampled, context }
    }
}

impl AlgorithmHandler for McHandler {
    fn route(
        &self,
        start: NodeId,
        target: NodeId,
        search_space: bool,
    ) -> Result<Vec<RouteResult>, EngineError> {
        let mut context = self
            .context
            .lock()
            .map_err(|_| EngineError::Internal("handler context poisoned".into()))?;

        let solutions = context.run(&self.sampled, start, target);
        let mut results = Vec::with_capacity(solutions.len());
        for solution in &solutions {
            let mut route = to_result_pairs(target, solution, context.labels());
            if search_space {
                route.search_space =
                    get_search_space(context.labels(), None, &self.data.coordinates);
            }
            results.push(route);
        }
        Ok(results)
    }
}

// ── multi-criteria with charging ──────────────────────────────────────────────

pub struct MccHandler {
    data: Arc<GraphData>,
    sampled: SampledGraph,
    context: Mutex<MccContext>,
}

impl MccHandler {
    pub fn new(data: Arc<GraphData>, capacity: f64) -> Self {
        let sampled = to_sampled(&data.graph, SAMPLE_RESOLUTION);
        let reverse_durations = to_min_duration(&data.graph).invert();
        let context = Mutex::new(MccContext::new(
            EPS_X,
            EPS_Y,
            SAMPLE_RESOLUTION,
            capacity,
            CHARGING_PENALTY,
            data.chargers.clone(),
            landmark_potentials(&reverse_durations),
            sampled.num_nodes(),
        ));
        Self { data, sampled, context }
    }
}

impl AlgorithmHandler for MccHandler {
    fn route(
        &self,
        start: NodeId,
        target: NodeId,
        search_space: bool,
    ) -> Result<Vec<RouteResult>, EngineError> {
        let mut context = self
            .context
            .lock()
            .map_err(|_| EngineError::Internal("handler context poisoned".into()))?;

        let solutions = context.run(&self.sampled, start, target);
        let mut results = Vec::with_capacity(solutions.len());
        for solution in &solutions {
            let mut route = to_result_pairs(target, solution, context.labels());
            if search_space {
                route.search_space = get_search_space(
                    context.labels(),
                    Some(&self.data.chargers),
                    &self.data.coordinates,
                );
            }
            results.push(route);
        }
        Ok(results)
    }
}

// ── functional Pareto ─────────────────────────────────────────────────────────

pub struct FpHandler {
    data: Arc<GraphData>,
    context: Mutex<FpAStarContext>,
}

impl FpHandler {
    pub fn new(data: Arc<GraphData>, capacity: f64) -> Self {
        let reverse_durations = to_min_duration(&data.graph).invert();
        let context = Mutex::new(FpAStarContext::new(
            EPS_X,
            EPS_Y,
            capacity,
            landmark_potentials(&reverse_durations),
            data.graph.num_nodes(),
        ));
        Self { data, context }
    }
}

impl AlgorithmHandler for FpHandler {
    fn route(
        &self,
        start: NodeId,
        target: NodeId,
        search_space: bool,
    ) -> Result<Vec<RouteResult>, EngineError> {
        let mut context = self
            .context
            .lock()
            .map_err(|_| EngineError::Internal("handler context poisoned".into()))?;

        let solutions = context.run(&self.data.graph, start, target);
        let mut results = Vec::with_capacity(solutions.len());
        for solution in &solutions {
            let mut route = to_result_tradeoff(target, solution, context.labels());
            if search_space {
                route.search_space =
                    get_search_space(context.labels(), None, &self.data.coordinates);
            }
            results.push(route);
        }
        Ok(results)
    }
}

// ── functional Pareto with charging ───────────────────────────────────────────

pub struct FpcHandler {
    data: Arc<GraphData>,
    context: Mutex<FpcContext>,
}

impl FpcHandler {
    pub fn new(data: Arc<GraphData>, capacity: f64, precompute_profiles: bool) -> Self {
        let reverse_durations = to_min_duration(&data.graph).invert();
        let context = Mutex::new(FpcContext::new(
            EPS_X,
            EPS_Y,
            capacity,
            CHARGING_PENALTY,
            data.chargers.clone(),
            landmark_potentials(&reverse_durations),
            data.graph.num_nodes(),
            precompute_profiles,
        ));
        Self { data, context }
    }
}

impl AlgorithmHandler for FpcHandler {
    fn route(
        &self,
        start: NodeId,
        target: NodeId,
        search_space: bool,
    ) -> Result<Vec<RouteResult>, EngineError> {
        let mut context = self
            .context
            .lock()
            .map_err(|_| EngineError::Internal("handler context poisoned".into()))?;

        let solutions = context.run(&self.data.graph, start, target);
        let mut results = Vec::with_capacity(solutions.len());
        for solution in &solutions {
            let mut route = to_result_tradeoff(target, solution, context.labels());
            if search_space {
                route.search_space = get_search_space(
                    context.labels(),
                    Some(&self.data.chargers),
                    &self.data.coordinates,
                );
            }
            results.push(route);
        }
        Ok(results)
    }
}
