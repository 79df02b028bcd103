//! Cache-first loading with a stale fallback

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

use timed_store::{FreshnessPolicy, TimedStore};

/// Where a loaded payload came from.
///
/// Ordered from best to most degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Served from the store within the primary TTL
    Fresh,
    /// Produced by a live fetch and written to the store
    Fetched,
    /// The fetch failed; served from the store within the relaxed TTL
    Stale,
}

/// A payload plus how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome<T> {
    pub data: T,
    pub freshness: Freshness,
}

/// Decides between the store and a producer for one cache key.
///
/// A call either returns a complete payload or fails; the producer is
/// invoked at most once per call.
#[derive(Clone)]
pub struct CachedLoader {
    store: TimedStore,
    stale_multiplier: u32,
}

impl CachedLoader {
    pub const DEFAULT_STALE_MULTIPLIER: u32 = 4;

    pub fn new(store: TimedStore) -> Self {
        Self::with_stale_multiplier(store, Self::DEFAULT_STALE_MULTIPLIER)
    }

    pub fn with_stale_multiplier(store: TimedStore, stale_multiplier: u32) -> Self {
        Self {
            store,
            stale_multiplier: stale_multiplier.max(1),
        }
    }

    pub fn store(&self) -> &TimedStore {
        &self.store
    }

    pub fn stale_multiplier(&self) -> u32 {
        self.stale_multiplier
    }

    /// Return the cached payload under `key` if it is within `policy`,
    /// otherwise run `producer`, store its result and return it.
    ///
    /// When the producer fails, an entry within the relaxed window
    /// (`policy` times the stale multiplier) is returned instead; if there is
    /// none, any entry left under `key` is evicted and the producer's error is
    /// returned unchanged.
    pub async fn load_with_cache<T, E, F, Fut>(
        &self,
        key: &str,
        producer: F,
        policy: FreshnessPolicy,
    ) -> Result<LoadOutcome<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(data) = self.store.read(key, policy).await {
            debug!(key, "Cache hit");
            return Ok(LoadOutcome {
                data,
                freshness: Freshness::Fresh,
            });
        }
        debug!(key, "Cache miss, fetching");

        match producer().await {
            Ok(data) => {
                if let Err(e) = self.store.write(key, &data).await {
                    // The fetched data is still returned
                    warn!(key, error = %e, "Failed to write cache entry");
                }
                Ok(LoadOutcome {
                    data,
                    freshness: Freshness::Fetched,
                })
            }
            Err(err) => {
                let relaxed = policy.relaxed(self.stale_multiplier);
                match self.store.read(key, relaxed).await {
                    Some(data) => {
                        warn!(key, error = %err, relaxed_ttl_minutes = relaxed.ttl_minutes, "Fetch failed, serving stale cache");
                        Ok(LoadOutcome {
                            data,
                            freshness: Freshness::Stale,
                        })
                    }
                    None => {
                        // Past the relaxed window or unreadable; no policy will accept it
                        if let Err(e) = self.store.evict(key).await {
                            debug!(key, error = %e, "Failed to evict unusable cache entry");
                        }
                        Err(err)
                    }
                }
            }
        }
    }
}
