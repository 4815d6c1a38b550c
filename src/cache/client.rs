//! Cache Client Module
//!
//! Fault-tolerant string key-value client over a Redis-compatible store.
//!
//! Store failures never escape as errors. Writes degrade to no-ops, reads
//! degrade to the absent-marker (`None`), and `ready()` is the single place
//! where the state of the connection becomes observable.

use std::fmt;
use std::sync::{Arc, RwLock};

use redis::aio::MultiplexedConnection;
use redis::Client;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, LIVENESS_PROBE};
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};

/// First-wins process-wide client, see [`CacheClient::instance`].
static INSTANCE: OnceCell<Arc<CacheClient>> = OnceCell::const_new();

// == Connection State ==
/// Handle and failure latch, swapped together under one short-lived lock.
#[derive(Default)]
struct ConnectionState {
    /// The single open handle, if any
    handle: Option<MultiplexedConnection>,
    /// Set when a connect attempt failed and no reconnect has succeeded since
    connection_error: bool,
}

// == Cache Client ==
/// String key-value client holding at most one connection to the store.
pub struct CacheClient {
    config: CacheConfig,
    state: Mutex<ConnectionState>,
    /// Held for the whole of `check()`, never by operations
    reconnect: Mutex<()>,
    stats: RwLock<CacheStats>,
}

impl CacheClient {
    // == Constructor ==
    /// Creates a client and attempts one connection to `host:port`.
    ///
    /// Never fails. When the store is unreachable the client is returned
    /// with its failure latch set and `ready()` must be called before
    /// relying on it.
    pub async fn connect(config: CacheConfig) -> Self {
        let mut state = ConnectionState::default();

        match open_connection(&config).await {
            Ok(conn) => {
                info!(host = %config.host, port = config.port, "Connected to cache store");
                state.handle = Some(conn);
            }
            Err(e) => {
                warn!(host = %config.host, port = config.port, error = %e, "Cache store unreachable");
                state.connection_error = true;
            }
        }

        Self {
            config,
            state: Mutex::new(state),
            reconnect: Mutex::new(()),
            stats: RwLock::new(CacheStats::new()),
        }
    }

    // == Shared Instance ==
    /// Returns the process-wide client, creating it from `config` on first call.
    ///
    /// Later calls ignore their `config` and return the first instance.
    /// Prefer owning a client in the composition root and passing it down;
    /// this exists for code that cannot be handed one.
    pub async fn instance(config: &CacheConfig) -> Arc<CacheClient> {
        let client = INSTANCE
            .get_or_init(|| async move { Arc::new(CacheClient::connect(config.clone()).await) })
            .await;

        if client.config() != config {
            debug!(
                requested = %config.url(),
                active = %client.config().url(),
                "Shared cache client already exists, ignoring requested config"
            );
        }

        Arc::clone(client)
    }

    // == Ready ==
    /// Reports whether the store is usable right now.
    ///
    /// Reconnects at most once when the failure latch is set or the handle
    /// was closed, then requires an open handle and an echoed liveness probe.
    pub async fn ready(&self) -> bool {
        match self.check().await {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Cache store not ready");
                false
            }
        }
    }

    /// Same as [`ready`](Self::ready) but reports why the store is unusable.
    ///
    /// The state lock is only held to read or swap the handle, so operations
    /// running concurrently degrade immediately instead of waiting on the
    /// reconnect or the probe.
    pub async fn check(&self) -> CacheResult<()> {
        // Serializes reconnects so at most one handle is ever opened
        let _reconnect = self.reconnect.lock().await;

        let current = {
            let state = self.state.lock().await;
            if state.connection_error {
                None
            } else {
                state.handle.clone()
            }
        };

        let mut conn = match current {
            Some(conn) => conn,
            None => self.reopen().await?,
        };

        let reply: String = match redis::cmd("PING")
            .arg(LIVENESS_PROBE)
            .query_async(&mut conn)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                // No connect attempt failed, so only the handle goes; the
                // next check reconnects because none is held
                self.state.lock().await.handle = None;
                return Err(e.into());
            }
        };

        if reply != LIVENESS_PROBE {
            return Err(CacheError::ProbeMismatch(reply));
        }

        Ok(())
    }

    /// Opens a fresh handle and installs it, or latches the failure.
    async fn reopen(&self) -> CacheResult<MultiplexedConnection> {
        match open_connection(&self.config).await {
            Ok(conn) => {
                let mut state = self.state.lock().await;
                state.handle = Some(conn.clone());
                state.connection_error = false;
                drop(state);

                self.with_stats(CacheStats::record_reconnect);
                info!(host = %self.config.host, port = self.config.port, "Reconnected to cache store");
                Ok(conn)
            }
            Err(e) => {
                self.state.lock().await.connection_error = true;
                Err(e)
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` without expiry. Failures are swallowed.
    pub async fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.try_set(key, value, None).await {
            self.degrade("SET", key, &e);
        }
    }

    // == Set Expire ==
    /// Stores `value` under `key` for `seconds`. Failures are swallowed.
    ///
    /// A zero TTL is rejected as a degraded no-op.
    pub async fn set_expire(&self, key: &str, value: &str, seconds: u64) {
        if let Err(e) = self.try_set(key, value, Some(seconds)).await {
            self.degrade("SETEX", key, &e);
        }
    }

    /// Stores `value` under `key` for the configured default TTL (3600s unless overridden).
    pub async fn set_expire_default(&self, key: &str, value: &str) {
        self.set_expire(key, value, self.config.default_ttl).await;
    }

    // == Get ==
    /// Returns the stored value, or `None` when the key is absent, expired
    /// or the store is unavailable.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key).await {
            Ok(Some(value)) => {
                self.with_stats(CacheStats::record_hit);
                Some(value)
            }
            Ok(None) => {
                self.with_stats(CacheStats::record_miss);
                None
            }
            Err(e) => {
                self.degrade("GET", key, &e);
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key` if present. Failures are swallowed.
    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.try_delete(key).await {
            self.degrade("DEL", key, &e);
        }
    }

    // == Key Exists ==
    /// True iff `key` is present and not expired. False when the store is unavailable.
    pub async fn key_exists(&self, key: &str) -> bool {
        match self.try_exists(key).await {
            Ok(exists) => exists,
            Err(e) => {
                self.degrade("EXISTS", key, &e);
                false
            }
        }
    }

    // == Close ==
    /// Releases the connection handle. Only `ready()` reopens it.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if state.handle.take().is_some() {
            info!(host = %self.config.host, port = self.config.port, "Closed cache store connection");
        }
    }

    // == Accessors ==
    /// Configuration the client was created with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Whether a connection handle is currently held.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.handle.is_some()
    }

    /// Whether the failure latch is set.
    pub async fn has_connection_error(&self) -> bool {
        self.state.lock().await.connection_error
    }

    /// Snapshot of the client counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    // == Fallible Operations ==
    async fn try_set(&self, key: &str, value: &str, ttl: Option<u64>) -> CacheResult<()> {
        if ttl == Some(0) {
            return Err(CacheError::InvalidTtl);
        }

        let mut conn = self.handle().await?;
        let cmd = match ttl {
            Some(seconds) => {
                let mut cmd = redis::cmd("SETEX");
                cmd.arg(key).arg(seconds).arg(value);
                cmd
            }
            None => {
                let mut cmd = redis::cmd("SET");
                cmd.arg(key).arg(value);
                cmd
            }
        };

        let _: () = cmd.query_async(&mut conn).await?;
        Ok(())
    }

    async fn try_get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.handle().await?;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn try_delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.handle().await?;
        let removed: i64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
        debug!(key, removed, "Cache key deleted");
        Ok(())
    }

    async fn try_exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.handle().await?;
        let count: i64 = redis::cmd("EXISTS").arg(key).query_async(&mut conn).await?;
        Ok(count > 0)
    }

    /// Clones the open handle. Operations never reconnect on their own.
    async fn handle(&self) -> CacheResult<MultiplexedConnection> {
        self.state
            .lock()
            .await
            .handle
            .clone()
            .ok_or(CacheError::Disconnected)
    }

    fn degrade(&self, op: &'static str, key: &str, err: &CacheError) {
        match err {
            CacheError::Disconnected => debug!(op, key, "Cache operation skipped, not connected"),
            _ => warn!(op, key, error = %err, "Cache operation failed"),
        }
        self.with_stats(CacheStats::record_degraded);
    }

    fn with_stats(&self, f: impl FnOnce(&mut CacheStats)) {
        if let Ok(mut stats) = self.stats.write() {
            f(&mut stats);
        }
    }
}

impl fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheClient")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .finish_non_exhaustive()
    }
}

/// Opens a multiplexed connection to the store described by `config`.
async fn open_connection(config: &CacheConfig) -> CacheResult<MultiplexedConnection> {
    let client = Client::open(config.url())
        .map_err(|e| CacheError::ConnectionFailure(format!("invalid address {}: {}", config.url(), e)))?;

    client
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| CacheError::ConnectionFailure(format!("{}:{}: {}", config.host, config.port, e)))
}
