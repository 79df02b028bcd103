use std::env;
use std::path::PathBuf;
use std::time::Duration;

use content_sources::{
    BattleRoyaleNews, BlogFeed, EsportsMatches, HotPosts, ProfileGenerator, TrendingGames,
};

/// Upstream base URLs, overridable for staging and tests
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub reddit: String,
    pub blog: String,
    pub profiles: String,
    pub rawg: String,
    pub fortnite: String,
    pub pandascore: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            reddit: HotPosts::DEFAULT_BASE_URL.to_string(),
            blog: BlogFeed::DEFAULT_BASE_URL.to_string(),
            profiles: ProfileGenerator::DEFAULT_BASE_URL.to_string(),
            rawg: TrendingGames::DEFAULT_BASE_URL.to_string(),
            fortnite: BattleRoyaleNews::DEFAULT_BASE_URL.to_string(),
            pandascore: EsportsMatches::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Site configuration, built once at startup and passed by reference
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub cache_ttl_minutes: u64,
    pub stale_multiplier: u32,
    pub fetch_timeout: Duration,
    pub cache_dir: PathBuf,
    pub locker_url: String,
    pub fortnite_api_key: Option<String>,
    pub rawg_api_key: Option<String>,
    pub pandascore_api_key: Option<String>,
    pub endpoints: Endpoints,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: 15,
            stale_multiplier: 4,
            fetch_timeout: bounded_fetch::DEFAULT_TIMEOUT,
            cache_dir: PathBuf::from("./cache/gamehub"),
            locker_url: "https://redirectapps.online/cl/i/j76wev".to_string(),
            fortnite_api_key: None,
            rawg_api_key: None,
            pandascore_api_key: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl SiteConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Parse configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_ttl_minutes = lookup("CACHE_TTL_MINUTES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.cache_ttl_minutes);

        let stale_multiplier = lookup("STALE_MULTIPLIER")
            .and_then(|v| v.parse().ok())
            .map(|m: u32| m.max(1))
            .unwrap_or(defaults.stale_multiplier);

        let fetch_timeout = lookup("FETCH_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_timeout);

        let cache_dir = lookup("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);

        let locker_url = lookup("LOCKER_URL").unwrap_or(defaults.locker_url);

        // An empty credential means "not configured"
        let credential = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint = |name: &str, default: String| lookup(name).unwrap_or(default);
        let d = defaults.endpoints;
        let endpoints = Endpoints {
            reddit: endpoint("REDDIT_BASE_URL", d.reddit),
            blog: endpoint("BLOG_BASE_URL", d.blog),
            profiles: endpoint("PROFILES_BASE_URL", d.profiles),
            rawg: endpoint("RAWG_BASE_URL", d.rawg),
            fortnite: endpoint("FORTNITE_BASE_URL", d.fortnite),
            pandascore: endpoint("PANDASCORE_BASE_URL", d.pandascore),
        };

        Self {
            cache_ttl_minutes,
            stale_multiplier,
            fetch_timeout,
            cache_dir,
            locker_url,
            fortnite_api_key: credential("FORTNITE_API_KEY"),
            rawg_api_key: credential("RAWG_API_KEY"),
            pandascore_api_key: credential("PANDASCORE_API_KEY"),
            endpoints,
        }
    }
}
