use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::adapter::SourceAdapter;
use crate::error::Result;
use crate::record::SourceRecord;

/// Concatenation of several subsources.
///
/// Subsources load concurrently. A failed subsource contributes nothing
/// instead of failing the whole load, and results keep declaration order
/// regardless of which subsource finishes first.
pub struct Aggregate {
    name: String,
    subsources: Vec<Box<dyn SourceAdapter>>,
}

impl Aggregate {
    pub fn new(name: &str, subsources: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self {
            name: name.to_string(),
            subsources,
        }
    }

    pub fn len(&self) -> usize {
        self.subsources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsources.is_empty()
    }
}

#[async_trait]
impl SourceAdapter for Aggregate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        let results = join_all(self.subsources.iter().map(|s| s.load())).await;

        let mut records = Vec::new();
        for (subsource, result) in self.subsources.iter().zip(results) {
            match result {
                Ok(batch) => records.extend(batch),
                Err(e) => {
                    warn!(aggregate = %self.name, subsource = subsource.name(), error = %e, "Subsource failed, skipping");
                }
            }
        }

        debug!(aggregate = %self.name, count = records.len(), "Loaded aggregate");
        Ok(records)
    }
}
