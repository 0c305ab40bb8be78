//! The request pipeline.
//!
//! # Route planning steps
//!
//! 1. Validate the request (point ranges, survivor fields, at least one
//!    pickup) before touching any graph.
//! 2. Load the area's graph through the cache.
//! 3. Deduplicate the reported points.
//! 4. Make two private copies: a directed display copy and an undirected
//!    routing copy.  The cached graph is never mutated.
//! 5. Apply the edge edits and integrate the points into both copies.
//! 6. Cost the routing copy, with traversal predictions when a model is
//!    configured and works.
//! 7. Aggregate survivors per node, dispatch, and expand the node paths
//!    into road shapes.

use tracing::{info, warn};

use rd_cache::{CacheKey, GraphCache, key_of};
use rd_core::BoundingBox;
use rd_dispatch::{CostGraph, aggregate_survivors, dispatch, pickup_nodes};
use rd_graph::{
    EdgeProbabilities, GraphSource, RoadGraph, TraversalModel, deduplicate, edit_edge_states,
    integrate_points,
};

use crate::config::PlannerConfig;
use crate::geometry::route_coordinates;
use crate::request::{PlannedRoute, RoutePlan, RouteRequest};
use crate::{PlanError, PlanResult};

/// Owns the cache, the graph source, and the optional traversal model.
///
/// All operations take `&self`; a `Planner` can be shared across threads.
pub struct Planner {
    cache:  GraphCache,
    source: Box<dyn GraphSource>,
    model:  Option<Box<dyn TraversalModel>>,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(cache: GraphCache, source: impl GraphSource + 'static, config: PlannerConfig) -> Self {
        Self { cache, source: Box::new(source), model: None, config }
    }

    /// Open the on-disk cache named by `config.cache`.
    pub fn open(config: PlannerConfig, source: impl GraphSource + 'static) -> PlanResult<Self> {
        let cache = GraphCache::open(config.cache.clone())?;
        Ok(Self::new(cache, source, config))
    }

    /// Use `model` to discount edges that are likely passable.
    pub fn with_model(mut self, model: impl TraversalModel + 'static) -> Self {
        self.model = Some(Box::new(model));
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn cache(&self) -> &GraphCache {
        &self.cache
    }

    /// The graph for `bbox` and its session id.
    pub fn load_graph(&self, bbox: &BoundingBox) -> PlanResult<(CacheKey, RoadGraph)> {
        let graph = self.cache.fetch_or_load(bbox, self.source.as_ref())?;
        Ok((key_of(bbox), graph))
    }

    /// Run the full pipeline for `request`.
    pub fn plan_routes(&self, request: &RouteRequest) -> PlanResult<RoutePlan> {
        request.validate()?;
        let (session, cached) = self.load_graph(&request.bbox)?;

        let points = deduplicate(&request.nodes, &self.config.dedup);

        let mut display = cached.clone();
        let mut routing = cached.to_undirected();
        drop(cached);

        edit_edge_states(&mut display, &request.modified_edges);
        edit_edge_states(&mut routing, &request.modified_edges);

        integrate_points(&mut display, &points, &self.config.snap)?;
        let snapped = integrate_points(&mut routing, &points, &self.config.snap)?;

        let probabilities = self.predict(&routing);
        self.config.cost.apply(&mut routing, probabilities.as_ref());

        let pickups = pickup_nodes(&snapped);
        if pickups.is_empty() {
            return Err(PlanError::InvalidRequest("no pickup points supplied".into()));
        }
        let groups = aggregate_survivors(&snapped);

        let outcome = dispatch(&CostGraph::from_road_graph(&routing), &pickups, &groups)?;

        let routes: Vec<PlannedRoute> = outcome
            .routes
            .iter()
            .map(|r| PlannedRoute {
                vehicle:     r.vehicle,
                nodes:       r.path.clone(),
                coordinates: route_coordinates(&routing, &r.path),
                cost:        r.total_cost(),
            })
            .collect();

        if !outcome.unassigned.is_empty() {
            let nodes: Vec<i64> = outcome.unassigned.iter().map(|g| g.node.0).collect();
            warn!(%session, ?nodes, "survivor groups unreachable from every pickup");
        }
        info!(
            %session,
            points = points.len(),
            vehicles = pickups.len(),
            groups = groups.len(),
            routes = routes.len(),
            "routes planned"
        );

        Ok(RoutePlan {
            session,
            display_graph: display,
            routes,
            unassigned: outcome.unassigned,
        })
    }

    /// Model predictions, or `None` if no model is set or it failed.
    fn predict(&self, graph: &RoadGraph) -> Option<EdgeProbabilities> {
        let model = self.model.as_ref()?;
        match model.predict(graph) {
            Ok(probs) => Some(probs),
            Err(e) => {
                warn!(error = %e, "traversal model failed; using undiscounted costs");
                None
            }
        }
    }
}
