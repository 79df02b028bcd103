//! Time-bounded key/value store
//!
//! Stamps every write with the current time and evaluates expiry when the
//! entry is read back. Backends are pluggable through [`KeyValueStore`]:
//! an in-memory moka cache, or one JSON file per key on disk.

mod backend;
mod clock;
mod error;
mod store;
mod types;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, StoreError};
pub use store::TimedStore;
pub use types::{CacheEnvelope, FreshnessPolicy};
