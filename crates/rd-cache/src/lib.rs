//! `rd-cache` — persistent road-graph cache keyed by bounding box.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`key`]    | `CacheKey` — 40-hex SHA-1 of the normalised bounding box     |
//! | [`clock`]  | `Clock` trait, `SystemClock`, `ManualClock`                  |
//! | [`config`] | `CacheConfig` — database path and the two TTLs               |
//! | [`store`]  | `GraphCache` — SQLite store, eviction, `fetch_or_load`       |
//! | [`error`]  | `CacheError`, `CacheResult<T>`                               |
//!
//! # Record lifecycle
//!
//! A record is written on the first successful fetch for its key, its
//! `last_access` is bumped on every hit, and it is deleted by
//! [`GraphCache::evict_expired`] once it has gone unread for longer than
//! the access TTL or was downloaded longer ago than the download TTL.
//! Eviction only runs after a miss, so a key being hit repeatedly is never
//! dropped in the middle of a burst.
//!
//! Two concurrent misses on one key both call the source and both write;
//! the last write wins.

pub mod clock;
pub mod config;
pub mod error;
pub mod key;
pub mod store;


pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use key::{CacheKey, CacheKeyError, key_of};
pub use store::GraphCache;
