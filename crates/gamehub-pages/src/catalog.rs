//! The site's section table, built from configuration

use bounded_fetch::BoundedFetcher;
use content_sources::{
    Aggregate, BattleRoyaleNews, BlogFeed, EsportsMatches, GatedSource, HotPosts, HttpSource,
    ProfileGenerator, SourceAdapter, TrendingGames,
};
use std::sync::Arc;
use timed_store::FreshnessPolicy;

use crate::config::SiteConfig;
use crate::locker::LockerRedirect;
use crate::section::{LoadSpec, Section, SectionPlan, SectionTable};

/// Cache keys, one per logical source
pub mod keys {
    pub const NEWS_BLOG: &str = "news_blog";
    pub const NEWS_GAMING: &str = "news_gaming";
    pub const MEMES: &str = "memes";
    pub const PROFILES: &str = "profiles";
    pub const TRENDING: &str = "trending";
    pub const BR_NEWS: &str = "br_news";
    pub const ESPORTS: &str = "esports";
}

const MEME_SUBREDDITS: [&str; 3] = ["gamingmemes", "robloxmemes", "FortNiteMemes"];

/// Build the table of every section the site knows how to fill
pub fn build_section_table(config: &SiteConfig, fetcher: &BoundedFetcher) -> SectionTable {
    let policy = FreshnessPolicy::minutes(config.cache_ttl_minutes);
    let host = |base_url: &str| HttpSource::new(fetcher.clone(), base_url, config.fetch_timeout);
    let endpoints = &config.endpoints;
    let reddit = |sub: &str, limit: u32| HotPosts::new(host(&endpoints.reddit), sub, limit);

    let news = SectionPlan::Load(vec![
        LoadSpec::new(
            keys::NEWS_BLOG,
            policy,
            Arc::new(BlogFeed::new(host(&endpoints.blog), "roblox-blog", 6)),
        ),
        LoadSpec::new(keys::NEWS_GAMING, policy, Arc::new(reddit("gaming", 8))),
    ]);

    let memes = Aggregate::new(
        "memes",
        MEME_SUBREDDITS
            .into_iter()
            .map(|sub| Box::new(reddit(sub, 12)) as Box<dyn SourceAdapter>)
            .collect(),
    );

    let profiles = ProfileGenerator::new(host(&endpoints.profiles), 12);

    let trending = GatedSource::select(
        config.rawg_api_key.as_deref(),
        |key| {
            Box::new(TrendingGames::new(host(&endpoints.rawg), key, 12)) as Box<dyn SourceAdapter>
        },
        || Box::new(reddit("pcgaming", 12)) as Box<dyn SourceAdapter>,
    );

    let br_news = GatedSource::select(
        config.fortnite_api_key.as_deref(),
        |key| {
            Box::new(BattleRoyaleNews::new(host(&endpoints.fortnite), key)) as Box<dyn SourceAdapter>
        },
        || Box::new(reddit("FortNiteBR", 8)) as Box<dyn SourceAdapter>,
    );

    let esports = GatedSource::select(
        config.pandascore_api_key.as_deref(),
        |key| {
            let matches = EsportsMatches::new(host(&endpoints.pandascore), key, 10);
            Box::new(matches) as Box<dyn SourceAdapter>
        },
        || Box::new(reddit("esports", 8)) as Box<dyn SourceAdapter>,
    );

    let single = |key: &str, adapter: Arc<dyn SourceAdapter>| {
        SectionPlan::Load(vec![LoadSpec::new(key, policy, adapter)])
    };

    SectionTable::new()
        .with(Section::News, news)
        .with(Section::Memes, single(keys::MEMES, Arc::new(memes)))
        .with(Section::Profiles, single(keys::PROFILES, Arc::new(profiles)))
        .with(
            Section::Giveaways,
            SectionPlan::Static(LockerRedirect::new(&config.locker_url).giveaways()),
        )
        .with(Section::Trending, single(keys::TRENDING, Arc::new(trending)))
        .with(Section::BattleRoyaleNews, single(keys::BR_NEWS, Arc::new(br_news)))
        .with(Section::Esports, single(keys::ESPORTS, Arc::new(esports)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{CachedLoader, Freshness};
    use crate::orchestrator::{PageOrchestrator, SectionOutcome};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashSet;
    use timed_store::{Clock, KeyValueStore, MemoryStore, SystemClock, TimedStore};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn load_keys(table: &SectionTable) -> Vec<String> {
        table
            .iter()
            .filter_map(|(_, plan)| match plan {
                SectionPlan::Load(specs) => Some(specs.iter().map(|s| s.key.clone())),
                SectionPlan::Static(_) => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_every_section_has_a_plan() {
        let table = build_section_table(&SiteConfig::default(), &BoundedFetcher::new());
        for section in Section::ALL {
            assert!(table.get(section).is_some(), "missing plan for {section}");
        }
    }

    #[test]
    fn test_cache_keys_are_distinct() {
        let table = build_section_table(&SiteConfig::default(), &BoundedFetcher::new());
        let keys = load_keys(&table);
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(keys.len(), unique.len());
        assert_eq!(keys.len(), 7);
    }

    #[test]
    fn test_policy_follows_config() {
        let config = SiteConfig {
            cache_ttl_minutes: 42,
            ..SiteConfig::default()
        };
        let table = build_section_table(&config, &BoundedFetcher::new());
        match table.get(Section::Profiles) {
            Some(SectionPlan::Load(specs)) => {
                assert_eq!(specs[0].policy, FreshnessPolicy::minutes(42))
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_fallbacks_without_credentials() {
        let table = build_section_table(&SiteConfig::default(), &BoundedFetcher::new());
        let adapter_name = |section| match table.get(section) {
            Some(SectionPlan::Load(specs)) => specs[0].adapter.name().to_string(),
            other => panic!("unexpected plan: {other:?}"),
        };
        assert_eq!(adapter_name(Section::Trending), "r/pcgaming");
        assert_eq!(adapter_name(Section::BattleRoyaleNews), "r/FortNiteBR");
        assert_eq!(adapter_name(Section::Esports), "r/esports");
    }

    #[test]
    fn test_premium_with_credentials() {
        let config = SiteConfig {
            rawg_api_key: Some("rawg".to_string()),
            fortnite_api_key: Some("fn".to_string()),
            pandascore_api_key: Some("ps".to_string()),
            ..SiteConfig::default()
        };
        let table = build_section_table(&config, &BoundedFetcher::new());
        let adapter_name = |section| match table.get(section) {
            Some(SectionPlan::Load(specs)) => specs[0].adapter.name().to_string(),
            other => panic!("unexpected plan: {other:?}"),
        };
        assert_eq!(adapter_name(Section::Trending), "trending-games");
        assert_eq!(adapter_name(Section::BattleRoyaleNews), "br-news");
        assert_eq!(adapter_name(Section::Esports), "esports");
    }

    #[tokio::test]
    async fn test_trending_falls_back_to_hot_posts_and_caches() {
        let router = Router::new().route(
            "/r/pcgaming/hot.json",
            get(|| async {
                Json(json!({
                    "data": { "children": [
                        { "data": {
                            "title": "New release week",
                            "permalink": "/r/pcgaming/comments/abc/new/",
                            "thumbnail": "self"
                        }}
                    ]}
                }))
            }),
        );
        let base = serve(router).await;

        let mut config = SiteConfig::default();
        config.endpoints.reddit = base;
        // Nothing listens on the premium endpoint
        config.endpoints.rawg = "http://127.0.0.1:1".to_string();

        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let loader = CachedLoader::new(TimedStore::with_clock(backend, clock));
        let table = build_section_table(&config, &BoundedFetcher::new());
        let orchestrator = PageOrchestrator::new(loader.clone(), table);

        let report = orchestrator.boot(&[Section::Trending][..]).await;
        match report.get(Section::Trending) {
            Some(SectionOutcome::Ready { records, freshness }) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].title, "New release week");
                assert_eq!(records[0].source, "r/pcgaming");
                assert_eq!(*freshness, Freshness::Fetched);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let cached: Option<Vec<content_sources::SourceRecord>> = loader
            .store()
            .read(keys::TRENDING, FreshnessPolicy::minutes(config.cache_ttl_minutes))
            .await;
        assert_eq!(cached.map(|r| r.len()), Some(1));
    }
}
