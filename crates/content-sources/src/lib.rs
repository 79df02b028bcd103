//! Gaming content sources
//!
//! One adapter per third-party feed. Every adapter maps its own response
//! shape into [`SourceRecord`] so nothing downstream sees raw API fields.
//!
//! - [`HotPosts`] - link-aggregation hot posts for one subreddit
//! - [`BlogFeed`] - WordPress JSON posts feed
//! - [`ProfileGenerator`] - random player profiles
//! - [`TrendingGames`], [`BattleRoyaleNews`], [`EsportsMatches`] - premium
//!   feeds that need a credential
//! - [`GatedSource`] - picks a premium adapter or a free fallback
//! - [`Aggregate`] - concatenates several subsources, tolerating failures

mod adapter;
mod aggregate;
mod blog;
mod error;
mod gated;
mod hot_posts;
mod premium;
mod profiles;
mod record;
mod text;

#[cfg(test)]
pub(crate) mod test_support;

pub use adapter::{HttpSource, SourceAdapter};
pub use aggregate::Aggregate;
pub use blog::BlogFeed;
pub use error::{Result, SourceError};
pub use gated::GatedSource;
pub use hot_posts::HotPosts;
pub use premium::{BattleRoyaleNews, EsportsMatches, TrendingGames};
pub use profiles::ProfileGenerator;
pub use record::SourceRecord;
pub use text::{strip_tags, truncate_chars};
