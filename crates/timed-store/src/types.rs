//! Store types

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Persisted form of a cache entry: `{"ts": <epoch millis>, "data": <payload>}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    pub ts: i64,
    pub data: T,
}

impl<T> CacheEnvelope<T> {
    pub fn new(written_at: DateTime<Utc>, data: T) -> Self {
        Self {
            ts: written_at.timestamp_millis(),
            data,
        }
    }

    /// Write time, or `None` when the stamp is out of range
    pub fn written_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.ts).single()
    }
}

/// Maximum age, in minutes, for which an entry is usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessPolicy {
    pub ttl_minutes: u64,
}

impl FreshnessPolicy {
    pub fn minutes(ttl_minutes: u64) -> Self {
        Self { ttl_minutes }
    }

    /// The wider window used only after a refetch has failed
    pub fn relaxed(&self, multiplier: u32) -> Self {
        Self {
            ttl_minutes: self.ttl_minutes.saturating_mul(u64::from(multiplier)),
        }
    }

    pub fn max_age(&self) -> Duration {
        let minutes = i64::try_from(self.ttl_minutes).unwrap_or(i64::MAX / 60_000);
        Duration::try_minutes(minutes).unwrap_or(Duration::MAX)
    }

    /// Inclusive at exactly `ttl_minutes`; a negative age (clock skew) is fresh.
    pub fn is_fresh(&self, written_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(written_at) <= self.max_age()
    }
}
