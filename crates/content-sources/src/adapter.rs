//! Adapter trait and the shared HTTP plumbing behind it

use async_trait::async_trait;
use bounded_fetch::{BoundedFetcher, FetchOptions};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, SourceError};
use crate::record::SourceRecord;

/// A data source that produces normalized records
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short label used in logs and on every produced record
    fn name(&self) -> &str;

    async fn load(&self) -> Result<Vec<SourceRecord>>;
}

#[async_trait]
impl<A: SourceAdapter + ?Sized> SourceAdapter for Arc<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        (**self).load().await
    }
}

#[async_trait]
impl<A: SourceAdapter + ?Sized> SourceAdapter for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        (**self).load().await
    }
}

/// One upstream host reached through a [`BoundedFetcher`]
#[derive(Clone)]
pub struct HttpSource {
    fetcher: BoundedFetcher,
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(fetcher: BoundedFetcher, base_url: &str, timeout: Duration) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` and decode the body as `T`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        adapter: &str,
        path: &str,
        options: &FetchOptions,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let body = self.fetcher.fetch_bytes(&url, options, self.timeout).await?;

        serde_json::from_slice(&body).map_err(|error| SourceError::Decode {
            adapter: adapter.to_string(),
            error,
        })
    }
}
