//! Gamehub page loading
//!
//! Decides, per page, which content sections to fill and fills them
//! concurrently. Every load goes through [`CachedLoader`]: a fresh cache
//! entry short-circuits the network, a failed fetch falls back to a stale
//! entry, and one section's failure never touches another.

pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod locker;
pub mod orchestrator;
pub mod probe;
pub mod render;
pub mod section;

pub use catalog::build_section_table;
pub use config::{Endpoints, SiteConfig};
pub use error::{PagesError, Result};
pub use loader::{CachedLoader, Freshness, LoadOutcome};
pub use locker::LockerRedirect;
pub use orchestrator::{PageOrchestrator, PageReport, SectionOutcome, SectionReport};
pub use probe::{HtmlProbe, SectionProbe};
pub use render::{escape_html, render_page, render_section};
pub use section::{LoadSpec, Section, SectionPlan, SectionTable};
