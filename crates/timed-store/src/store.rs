//! Stamped writes and expiry-checked reads

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::backend::KeyValueStore;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::types::{CacheEnvelope, FreshnessPolicy};

/// Wraps a [`KeyValueStore`] with write-time stamping and read-time expiry.
///
/// Cloning is cheap; clones share the same backend.
pub struct TimedStore<S: ?Sized = dyn KeyValueStore, C: ?Sized = dyn Clock> {
    backend: Arc<S>,
    clock: Arc<C>,
}

impl<S: ?Sized, C: ?Sized> Clone for TimedStore<S, C> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: KeyValueStore + 'static> TimedStore<S, SystemClock> {
    pub fn new(backend: S) -> Self {
        Self {
            backend: Arc::new(backend),
            clock: Arc::new(SystemClock),
        }
    }
}

impl<S: KeyValueStore + ?Sized, C: Clock + ?Sized> TimedStore<S, C> {
    pub fn with_clock(backend: Arc<S>, clock: Arc<C>) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Stamp `payload` with the current time and persist it under `key`,
    /// replacing any existing entry.
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, payload: &T) -> Result<()> {
        let envelope = CacheEnvelope::new(self.clock.now(), payload);
        let raw = serde_json::to_string(&envelope)?;
        self.backend.set(key, raw).await
    }

    /// Payload under `key` if it exists and is within `policy`.
    ///
    /// Absent, expired, unparsable and wrongly-shaped entries all read as `None`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str, policy: FreshnessPolicy) -> Option<T> {
        let raw = self.backend.get(key).await?;

        let envelope: CacheEnvelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(key, error = %e, "Malformed cache entry treated as miss");
                return None;
            }
        };

        let written_at = envelope.written_at()?;
        if !policy.is_fresh(written_at, self.clock.now()) {
            debug!(key, ttl_minutes = policy.ttl_minutes, "Cache entry expired");
            return None;
        }

        Some(envelope.data)
    }

    /// Drop the entry under `key`
    pub async fn evict(&self, key: &str) -> Result<()> {
        self.backend.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileStore, MemoryStore};
    use crate::clock::ManualClock;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn memory_store() -> (TimedStore<MemoryStore, ManualClock>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = TimedStore::with_clock(Arc::new(MemoryStore::new()), clock.clone());
        (store, clock)
    }

    #[tokio::test]
    async fn test_read_within_ttl_returns_payload() {
        let (store, clock) = memory_store();
        store.write("profiles", &vec!["ada", "grace"]).await.unwrap();

        clock.advance(Duration::minutes(10));
        let hit: Option<Vec<String>> = store.read("profiles", FreshnessPolicy::minutes(15)).await;
        assert_eq!(hit, Some(vec!["ada".to_string(), "grace".to_string()]));
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let (store, clock) = memory_store();
        let policy = FreshnessPolicy::minutes(15);
        let written = clock.now();
        store.write("trending", &1u32).await.unwrap();

        clock.set(written + Duration::minutes(15));
        assert_eq!(store.read::<u32>("trending", policy).await, Some(1));

        clock.set(written + Duration::minutes(15) - Duration::milliseconds(1));
        assert_eq!(store.read::<u32>("trending", policy).await, Some(1));

        clock.set(written + Duration::minutes(15) + Duration::milliseconds(1));
        assert_eq!(store.read::<u32>("trending", policy).await, None);
    }

    #[tokio::test]
    async fn test_missing_key_is_absent() {
        let (store, _) = memory_store();
        assert_eq!(store.read::<u32>("nothing", FreshnessPolicy::minutes(15)).await, None);
    }

    #[tokio::test]
    async fn test_malformed_entry_is_absent() {
        let (store, _) = memory_store();
        store.backend().set("memes", "{not json".to_string()).await.unwrap();
        assert_eq!(store.read::<u32>("memes", FreshnessPolicy::minutes(15)).await, None);

        // Valid JSON but no timestamp
        store.backend().set("memes", r#"{"data":1}"#.to_string()).await.unwrap();
        assert_eq!(store.read::<u32>("memes", FreshnessPolicy::minutes(15)).await, None);
    }

    #[tokio::test]
    async fn test_wrong_payload_shape_is_absent() {
        let (store, _) = memory_store();
        store.write("profiles", &"a string").await.unwrap();
        let read: Option<Vec<u32>> = store.read("profiles", FreshnessPolicy::minutes(15)).await;
        assert_eq!(read, None);
    }

    #[tokio::test]
    async fn test_last_write_wins_and_restamps() {
        let (store, clock) = memory_store();
        store.write("news_gaming", &1u32).await.unwrap();
        clock.advance(Duration::minutes(14));
        store.write("news_gaming", &2u32).await.unwrap();
        clock.advance(Duration::minutes(14));

        assert_eq!(
            store.read::<u32>("news_gaming", FreshnessPolicy::minutes(15)).await,
            Some(2)
        );
    }

    #[tokio::test]
    async fn test_evict() {
        let (store, _) = memory_store();
        store.write("esports", &1u32).await.unwrap();
        store.evict("esports").await.unwrap();
        assert_eq!(store.read::<u32>("esports", FreshnessPolicy::minutes(15)).await, None);
    }

    #[tokio::test]
    async fn test_file_backend_envelope_on_disk() {
        let dir = tempdir().unwrap();
        let backend = FileStore::new(dir.path());
        backend.init().await.unwrap();
        let store = TimedStore::new(backend.clone());

        store.write("profiles", &vec![1, 2, 3]).await.unwrap();

        let raw = std::fs::read_to_string(backend.path_for("profiles")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json["ts"].as_i64().is_some());
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));

        let read: Option<Vec<u32>> = store.read("profiles", FreshnessPolicy::minutes(15)).await;
        assert_eq!(read, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_file_backend_corrupted_file_is_absent() {
        let dir = tempdir().unwrap();
        let backend = FileStore::new(dir.path());
        backend.init().await.unwrap();
        let store = TimedStore::new(backend.clone());

        store.write("memes", &vec!["x"]).await.unwrap();
        std::fs::write(backend.path_for("memes"), "garbage").unwrap();

        let read: Option<Vec<String>> = store.read("memes", FreshnessPolicy::minutes(15)).await;
        assert_eq!(read, None);
    }
}
