//! Concurrent, failure-isolated loading of every section on a page

use content_sources::SourceRecord;
use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info};

use crate::loader::{CachedLoader, Freshness};
use crate::probe::SectionProbe;
use crate::section::{LoadSpec, Section, SectionPlan, SectionTable};

/// Result of loading one section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Ready {
        records: Vec<SourceRecord>,
        /// Most degraded freshness among the section's loads
        freshness: Freshness,
    },
    Failed {
        /// Section-local message for display
        message: String,
        /// Underlying cause, for logs and diagnostics
        error: String,
    },
}

impl SectionOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn records(&self) -> &[SourceRecord] {
        match self {
            Self::Ready { records, .. } => records,
            Self::Failed { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub section: Section,
    pub outcome: SectionOutcome,
}

/// Everything a page boot produced, in section-table order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageReport {
    pub sections: Vec<SectionReport>,
}

impl PageReport {
    pub fn get(&self, section: Section) -> Option<&SectionOutcome> {
        self.sections
            .iter()
            .find(|r| r.section == section)
            .map(|r| &r.outcome)
    }

    pub fn failed(&self) -> impl Iterator<Item = Section> + '_ {
        self.sections
            .iter()
            .filter(|r| !r.outcome.is_ready())
            .map(|r| r.section)
    }
}

/// Fans out one branch per present section and collects every branch,
/// whatever happened to its siblings.
pub struct PageOrchestrator {
    loader: CachedLoader,
    table: SectionTable,
}

impl PageOrchestrator {
    pub fn new(loader: CachedLoader, table: SectionTable) -> Self {
        Self { loader, table }
    }

    pub fn table(&self) -> &SectionTable {
        &self.table
    }

    /// Load every section the probe reports as present
    pub async fn boot<P: SectionProbe + ?Sized>(&self, probe: &P) -> PageReport {
        let present: Vec<(Section, &SectionPlan)> = self
            .table
            .iter()
            .filter(|(section, _)| probe.is_present(*section))
            .collect();

        info!(
            sections = ?present.iter().map(|(s, _)| s.label()).collect::<Vec<_>>(),
            "Booting page"
        );

        let branches = present.into_iter().map(|(section, plan)| async move {
            SectionReport {
                section,
                outcome: self.load_section(section, plan).await,
            }
        });

        PageReport {
            sections: join_all(branches).await,
        }
    }

    /// Load a single section according to its plan
    pub async fn load_section(&self, section: Section, plan: &SectionPlan) -> SectionOutcome {
        let specs = match plan {
            SectionPlan::Static(records) => {
                return SectionOutcome::Ready {
                    records: records.clone(),
                    freshness: Freshness::Fresh,
                }
            }
            SectionPlan::Load(specs) => specs,
        };

        // Every load runs to completion so successful ones still get cached
        let results = join_all(specs.iter().map(|spec| self.load_spec(spec))).await;

        let mut records = Vec::new();
        let mut freshness = Freshness::Fresh;
        for (spec, result) in specs.iter().zip(results) {
            match result {
                Ok((batch, batch_freshness)) => {
                    records.extend(batch);
                    freshness = freshness.max(batch_freshness);
                }
                Err(e) => {
                    error!(section = %section, key = %spec.key, error = %e, "Section failed to load");
                    return SectionOutcome::Failed {
                        message: section.failure_message().to_string(),
                        error: e.to_string(),
                    };
                }
            }
        }

        SectionOutcome::Ready { records, freshness }
    }

    async fn load_spec(
        &self,
        spec: &LoadSpec,
    ) -> Result<(Vec<SourceRecord>, Freshness), content_sources::SourceError> {
        let outcome = self
            .loader
            .load_with_cache(&spec.key, || spec.adapter.load(), spec.policy)
            .await?;
        Ok((outcome.data, outcome.freshness))
    }
}
