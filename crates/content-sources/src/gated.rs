use async_trait::async_trait;
use tracing::debug;

use crate::adapter::SourceAdapter;
use crate::error::Result;
use crate::record::SourceRecord;

/// Credential-gated adapter selection.
///
/// A present, non-blank credential selects the premium adapter; anything else
/// selects the free fallback. Only the selected adapter is ever constructed,
/// so the other endpoint can never be called.
pub struct GatedSource {
    selected: Box<dyn SourceAdapter>,
    premium: bool,
}

impl GatedSource {
    pub fn select<P, F>(credential: Option<&str>, premium: P, fallback: F) -> Self
    where
        P: FnOnce(&str) -> Box<dyn SourceAdapter>,
        F: FnOnce() -> Box<dyn SourceAdapter>,
    {
        match credential.map(str::trim).filter(|c| !c.is_empty()) {
            Some(credential) => {
                let selected = premium(credential);
                debug!(source = selected.name(), "Credential present, using premium source");
                Self {
                    selected,
                    premium: true,
                }
            }
            None => {
                let selected = fallback();
                debug!(source = selected.name(), "No credential, using fallback source");
                Self {
                    selected,
                    premium: false,
                }
            }
        }
    }

    pub fn is_premium(&self) -> bool {
        self.premium
    }
}

#[async_trait]
impl SourceAdapter for GatedSource {
    fn name(&self) -> &str {
        self.selected.name()
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        self.selected.load().await
    }
}
