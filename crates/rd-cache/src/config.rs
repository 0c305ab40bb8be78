//! Cache configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the cache lives and how long records stay valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// SQLite database file, created on first open.
    pub db_path: PathBuf,

    /// A record unread for longer than this is evicted.
    pub access_ttl: Duration,

    /// A record downloaded longer ago than this is evicted, however hot.
    pub download_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_path:      PathBuf::from("graph_cache.sqlite"),
            access_ttl:   Duration::from_secs(24 * 3600),
            download_ttl: Duration::from_secs(7 * 24 * 3600),
        }
    }
}
