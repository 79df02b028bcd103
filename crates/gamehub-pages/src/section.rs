//! Page sections and the declarative table that says how to fill them

use content_sources::{SourceAdapter, SourceRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use timed_store::FreshnessPolicy;

/// A content section a page may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    News,
    Memes,
    Profiles,
    Giveaways,
    Trending,
    BattleRoyaleNews,
    Esports,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::News,
        Section::Memes,
        Section::Profiles,
        Section::Giveaways,
        Section::Trending,
        Section::BattleRoyaleNews,
        Section::Esports,
    ];

    /// CSS class of the container element that hosts this section
    pub fn marker(&self) -> &'static str {
        match self {
            Section::News => "news-list",
            Section::Memes => "meme-grid",
            Section::Profiles => "profile-grid",
            Section::Giveaways => "giveaway-grid",
            Section::Trending => "trending-grid",
            Section::BattleRoyaleNews => "fortnite-news",
            Section::Esports => "esports-list",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::News => "news",
            Section::Memes => "memes",
            Section::Profiles => "profiles",
            Section::Giveaways => "giveaways",
            Section::Trending => "trending",
            Section::BattleRoyaleNews => "br-news",
            Section::Esports => "esports",
        }
    }

    /// Text shown in place of the section when it cannot be loaded
    pub fn failure_message(&self) -> &'static str {
        match self {
            Section::News => "Failed to load news.",
            Section::Memes => "Failed to load memes.",
            Section::Profiles => "Failed to load profiles.",
            Section::Giveaways => "Failed to load giveaways.",
            Section::Trending => "Failed to load trending games.",
            Section::BattleRoyaleNews => "Failed to load Fortnite news.",
            Section::Esports => "Failed to load esports matches.",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.label() == s || section.marker() == s)
            .ok_or_else(|| format!("unknown section: {s}"))
    }
}

/// One cached load: a cache key, its TTL and the adapter that fills it
#[derive(Clone)]
pub struct LoadSpec {
    pub key: String,
    pub policy: FreshnessPolicy,
    pub adapter: Arc<dyn SourceAdapter>,
}

impl LoadSpec {
    pub fn new(key: &str, policy: FreshnessPolicy, adapter: Arc<dyn SourceAdapter>) -> Self {
        Self {
            key: key.to_string(),
            policy,
            adapter,
        }
    }
}

impl fmt::Debug for LoadSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadSpec")
            .field("key", &self.key)
            .field("policy", &self.policy)
            .field("adapter", &self.adapter.name())
            .finish()
    }
}

/// How a section gets its records
#[derive(Debug, Clone)]
pub enum SectionPlan {
    /// All loads must succeed; records concatenate in load order
    Load(Vec<LoadSpec>),
    /// Records known at build time, no network
    Static(Vec<SourceRecord>),
}

/// Section to plan mapping, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct SectionTable {
    plans: Vec<(Section, SectionPlan)>,
}

impl SectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the plan for `section`
    pub fn insert(&mut self, section: Section, plan: SectionPlan) -> &mut Self {
        match self.plans.iter_mut().find(|(s, _)| *s == section) {
            Some((_, existing)) => *existing = plan,
            None => self.plans.push((section, plan)),
        }
        self
    }

    pub fn with(mut self, section: Section, plan: SectionPlan) -> Self {
        self.insert(section, plan);
        self
    }

    pub fn get(&self, section: Section) -> Option<&SectionPlan> {
        self.plans
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, plan)| plan)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &SectionPlan)> {
        self.plans.iter().map(|(s, plan)| (*s, plan))
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
