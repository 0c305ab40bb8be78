//! `rd-plan` — turns a route request into vehicle routes.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`planner`]  | `Planner`: `load_graph`, `plan_routes`                     |
//! | [`request`]  | `RouteRequest`, `RoutePlan`, `PlannedRoute`                |
//! | [`geometry`] | `route_coordinates` — node paths to road shapes            |
//! | [`geojson`]  | FeatureCollections for graphs, routes, unreached groups    |
//! | [`config`]   | `PlannerConfig`                                            |
//! | [`error`]    | `PlanError`, `PlanResult<T>`                               |
//!
//! # Quick start
//!
//! ```ignore
//! let planner = Planner::open(PlannerConfig::default(), my_source)?;
//! let plan = planner.plan_routes(&RouteRequest::new(bbox, points))?;
//! println!("{}", rd_plan::geojson::routes(&plan.routes));
//! ```

pub mod config;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod planner;
pub mod request;


pub use config::PlannerConfig;
pub use error::{PlanError, PlanResult};
pub use geometry::route_coordinates;
pub use planner::Planner;
pub use request::{PlannedRoute, RoutePlan, RouteRequest};
