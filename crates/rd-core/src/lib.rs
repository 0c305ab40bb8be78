//! `rd-core` — foundational types for the relief-dispatch workspace.
//!
//! Every other `rd-*` crate depends on this one.  It has no `rd-*`
//! dependencies and keeps external ones to `serde` and `thiserror`.
//!
//! # What lives here
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`ids`]      | `NodeId` (road-network id), `EdgeId` (arena slot)        |
//! | [`geo`]      | `GeoPoint`, haversine distance                           |
//! | [`polyline`] | `Polyline` projection, interpolation, substring          |
//! | [`bbox`]     | `BoundingBox` validation and 5-decimal normalisation     |
//! | [`error`]    | `CoreError`, `CoreResult`                                |

pub mod bbox;
pub mod error;
pub mod geo;
pub mod ids;
pub mod polyline;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bbox::BoundingBox;
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, NodeId};
pub use polyline::Polyline;
