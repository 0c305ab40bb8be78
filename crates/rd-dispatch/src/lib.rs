//! `rd-dispatch` — greedy multi-vehicle survivor dispatch.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`network`]  | `CostGraph` (CSR) and `CostGraphBuilder`                   |
//! | [`router`]   | Dijkstra: `shortest_path`, `ShortestPathTree`              |
//! | [`survivor`] | `SurvivorGroup`, `aggregate_survivors`, `pickup_nodes`     |
//! | [`dispatch`] | `dispatch`, `DispatchOutcome`, `VehicleRoute`              |
//! | [`error`]    | `DispatchError`, `DispatchResult<T>`                       |
//!
//! # Algorithm
//!
//! One vehicle starts at each pickup.  Every round scores each
//! (vehicle, remaining survivor group) pair as
//!
//! ```text
//! (vehicle odometer + shortest-path cost) / (urgency² + count)
//! ```
//!
//! and commits the lowest-scoring pair; the first pair found wins a tie,
//! scanning vehicles in pickup order and groups in input order.  Pairs with
//! no path are skipped.  When no pair is reachable the remaining groups are
//! reported as unassigned.  Finally each vehicle that moved drives back to
//! its nearest pickup.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Initial per-vehicle searches run on Rayon's thread pool.   |

pub mod dispatch;
pub mod error;
pub mod network;
pub mod router;
pub mod survivor;

#[cfg(test)]
mod tests;

pub use dispatch::{DispatchOutcome, VehicleRoute, dispatch};
pub use error::{DispatchError, DispatchResult};
pub use network::{CostGraph, CostGraphBuilder};
pub use router::{Path, ShortestPathTree, shortest_path};
pub use survivor::{SurvivorGroup, aggregate_survivors, pickup_nodes};
