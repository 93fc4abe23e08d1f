//! Metadata caching over a Redis-compatible backend.
//!
//! The cache is a pure optimization: every resolution path must behave
//! correctly (if more slowly) with caching disabled. All backend failures
//! are swallowed and logged here and never reach the hot path. Connectivity
//! is probed exactly once at startup; if the probe fails the cache disables
//! itself for the process lifetime rather than re-trying on every call.

mod redis_store;

pub use redis_store::RedisStore;

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::models::TickerInfo;

/// Default TTL for cached metadata: 30 days. Ticker metadata changes
/// rarely; prices are excluded from caching entirely.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

const KEY_PREFIX: &str = "metadata:";

/// Errors from the cache backend. Never propagated past the cache API.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Minimal key-value surface the cache needs from its backend.
///
/// Production uses [`RedisStore`]; tests plug in an in-memory map.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Caching service for instrument metadata, keyed by ISIN.
pub struct MetadataCache {
    store: Option<Box<dyn KeyValueStore>>,
    ttl: Duration,
}

impl MetadataCache {
    /// Connect to the backend at `url`, probing it once. On probe failure
    /// the returned cache is permanently disabled.
    pub async fn connect(url: &str, ttl: Duration) -> Self {
        match RedisStore::connect(url).await {
            Ok(store) => {
                info!("Metadata cache (Redis) initialized");
                Self {
                    store: Some(Box::new(store)),
                    ttl,
                }
            }
            Err(e) => {
                warn!("Redis not available, caching disabled: {}", e);
                Self::disabled()
            }
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttl: DEFAULT_TTL,
        }
    }

    /// Build a cache over an arbitrary backend.
    pub fn with_store(store: Box<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            store: Some(store),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Look up cached metadata. Returns `None` on a miss, a disabled cache,
    /// or any backend error.
    pub async fn get(&self, isin: &str) -> Option<TickerInfo> {
        let store = self.store.as_ref()?;
        match store.get(&cache_key(isin)).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(info) => {
                    debug!("Cache hit for ISIN {}", isin);
                    Some(info)
                }
                Err(e) => {
                    error!("Error decoding cached metadata for {}: {}", isin, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!("Error reading from cache: {}", e);
                None
            }
        }
    }

    /// Store metadata with the configured TTL. Failures are logged and
    /// swallowed.
    pub async fn set(&self, isin: &str, info: &TickerInfo) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let payload = match serde_json::to_string(info) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Error encoding metadata for {}: {}", isin, e);
                return;
            }
        };
        match store.set_ex(&cache_key(isin), &payload, self.ttl).await {
            Ok(()) => debug!("Cached metadata for ISIN {}", isin),
            Err(e) => error!("Error writing to cache: {}", e),
        }
    }
}

fn cache_key(isin: &str) -> String {
    format!("{}{}", KEY_PREFIX, isin)
}
