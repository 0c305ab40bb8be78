//! SQLite-backed graph store.
//!
//! One table, one row per key:
//!
//! ```text
//! graph_cache(cache_key TEXT PRIMARY KEY, graph_blob BLOB,
//!             download_time REAL, last_access REAL)
//! ```
//!
//! The blob is the serde_json form of a [`RoadGraph`].  Each read and each
//! upsert runs in its own transaction; the connection is shared behind a
//! mutex so a `GraphCache` can be used from several threads.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use rd_core::BoundingBox;
use rd_graph::{GraphSource, RoadGraph};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::key::{CacheKey, key_of};
use crate::{CacheError, CacheResult};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS graph_cache (
                          cache_key     TEXT PRIMARY KEY,
                          graph_blob    BLOB NOT NULL,
                          download_time REAL NOT NULL,
                          last_access   REAL NOT NULL
                      );";

/// Persistent road-graph cache.
pub struct GraphCache {
    conn:   Mutex<Connection>,
    clock:  Box<dyn Clock>,
    config: CacheConfig,
}

impl GraphCache {
    /// Open (or create) the database at `config.db_path`.
    pub fn open(config: CacheConfig) -> CacheResult<Self> {
        Self::open_with_clock(config, SystemClock)
    }

    pub fn open_with_clock(config: CacheConfig, clock: impl Clock + 'static) -> CacheResult<Self> {
        let conn = Connection::open(&config.db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        Self::init(conn, config, Box::new(clock))
    }

    /// A private database that disappears with the cache.  `db_path` is
    /// ignored.
    pub fn in_memory(config: CacheConfig) -> CacheResult<Self> {
        Self::in_memory_with_clock(config, SystemClock)
    }

    pub fn in_memory_with_clock(config: CacheConfig, clock: impl Clock + 'static) -> CacheResult<Self> {
        Self::init(Connection::open_in_memory()?, config, Box::new(clock))
    }

    fn init(conn: Connection, config: CacheConfig, clock: Box<dyn Clock>) -> CacheResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn: Mutex::new(conn), clock, config })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of stored records.
    pub fn len(&self) -> CacheResult<usize> {
        let conn = self.lock()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM graph_cache", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    pub fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    // ── Record operations ─────────────────────────────────────────────────

    /// Stored graph for `key`, bumping its `last_access` on a hit.
    pub fn get(&self, key: &CacheKey) -> CacheResult<Option<RoadGraph>> {
        let blob: Option<Vec<u8>> = {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            let blob = tx
                .query_row(
                    "SELECT graph_blob FROM graph_cache WHERE cache_key = ?1",
                    params![key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            if blob.is_some() {
                tx.execute(
                    "UPDATE graph_cache SET last_access = ?1 WHERE cache_key = ?2",
                    params![self.clock.now(), key.as_str()],
                )?;
            }
            tx.commit()?;
            blob
        };

        match blob {
            Some(bytes) => {
                debug!(%key, bytes = bytes.len(), "graph cache hit");
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            None => {
                debug!(%key, "graph cache miss");
                Ok(None)
            }
        }
    }

    /// Store `graph` under `key`, replacing any previous record.  Both
    /// timestamps are set to now.
    pub fn put(&self, key: &CacheKey, graph: &RoadGraph) -> CacheResult<()> {
        let blob = serde_json::to_vec(graph)?;
        let now = self.clock.now();
        self.lock()?.execute(
            "REPLACE INTO graph_cache (cache_key, graph_blob, download_time, last_access) \
             VALUES (?1, ?2, ?3, ?3)",
            params![key.as_str(), blob, now],
        )?;
        debug!(%key, bytes = blob.len(), "graph cached");
        Ok(())
    }

    /// Delete every record past either TTL.  Returns how many were removed.
    pub fn evict_expired(&self) -> CacheResult<usize> {
        let now = self.clock.now();
        let access_cutoff = now - self.config.access_ttl.as_secs_f64();
        let download_cutoff = now - self.config.download_ttl.as_secs_f64();

        let removed = self.lock()?.execute(
            "DELETE FROM graph_cache WHERE last_access < ?1 OR download_time < ?2",
            params![access_cutoff, download_cutoff],
        )?;
        if removed > 0 {
            info!(removed, "expired graphs evicted");
        }
        Ok(removed)
    }

    // ── Orchestration ─────────────────────────────────────────────────────

    /// The graph for `bbox`: from the cache if present, otherwise from
    /// `source`, which is then stored and followed by an eviction sweep.
    ///
    /// # Errors
    ///
    /// [`CacheError::GraphUnavailable`] if `source` fails; nothing is
    /// stored in that case.
    pub fn fetch_or_load<S>(&self, bbox: &BoundingBox, source: &S) -> CacheResult<RoadGraph>
    where
        S: GraphSource + ?Sized,
    {
        let key = key_of(bbox);
        if let Some(graph) = self.get(&key)? {
            return Ok(graph);
        }

        let graph = source
            .fetch(bbox)
            .map_err(|source| CacheError::GraphUnavailable { bbox: *bbox, source })?;
        info!(
            %key,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "road graph fetched"
        );

        self.put(&key, &graph)?;
        self.evict_expired()?;
        Ok(graph)
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CacheError::Poisoned)
    }
}
