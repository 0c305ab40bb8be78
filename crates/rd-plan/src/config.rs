//! Planner configuration.

use serde::{Deserialize, Serialize};

use rd_cache::CacheConfig;
use rd_graph::{CostModel, DedupPolicy, SnapPolicy};

/// Everything a [`Planner`](crate::Planner) is tuned by.  Every field has
/// a default, so a partial JSON document is a valid config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub cache: CacheConfig,
    pub snap:  SnapPolicy,
    pub dedup: DedupPolicy,
    pub cost:  CostModel,
}
