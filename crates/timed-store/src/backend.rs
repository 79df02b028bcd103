//! Host key-value backends
//!
//! Backends store opaque strings. Stamping and expiry live in
//! [`TimedStore`](crate::TimedStore), so a backend never evicts on its own.

use async_trait::async_trait;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Raw value under `key`, `None` when absent or unreadable
    async fn get(&self, key: &str) -> Option<String>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: String) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process backend. Does not survive restarts.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    const MAX_ENTRIES: u64 = 10_000;

    pub fn new() -> Self {
        Self {
            entries: Cache::builder().max_capacity(Self::MAX_ENTRIES).build(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }
}

/// On-disk backend: one file per key, named by the SHA-256 of the key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the backing directory if needed
    pub async fn init(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Some(raw),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    debug!(key, error = %e, "Unreadable store file treated as absent");
                }
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        // Each write gets its own temp file, renamed over the entry when complete
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
