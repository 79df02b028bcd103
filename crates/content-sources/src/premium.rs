//! Feeds that require a credential
//!
//! These are only constructed when the credential is configured; see
//! [`GatedSource`](crate::GatedSource) for the free fallbacks.

use async_trait::async_trait;
use bounded_fetch::FetchOptions;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::adapter::{HttpSource, SourceAdapter};
use crate::error::Result;
use crate::record::SourceRecord;

// ---------------------------------------------------------------------------
// Game popularity (RAWG)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GamesPage {
    #[serde(default)]
    results: Vec<Game>,
}

#[derive(Debug, Deserialize)]
struct Game {
    name: String,
    slug: Option<String>,
    background_image: Option<String>,
    released: Option<String>,
    rating: Option<f64>,
}

/// Most-added games from the popularity API
pub struct TrendingGames {
    http: HttpSource,
    api_key: String,
    page_size: u32,
}

impl TrendingGames {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.rawg.io";

    pub fn new(http: HttpSource, api_key: &str, page_size: u32) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
            page_size,
        }
    }
}

#[async_trait]
impl SourceAdapter for TrendingGames {
    fn name(&self) -> &str {
        "trending-games"
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        let path = format!(
            "/api/games?key={}&ordering=-added&page_size={}",
            urlencoding::encode(&self.api_key),
            self.page_size
        );
        let page: GamesPage = self
            .http
            .get_json(self.name(), &path, &FetchOptions::default())
            .await?;

        Ok(page
            .results
            .into_iter()
            .map(|game| {
                let mut record = SourceRecord::new(self.name(), game.name)
                    .with_image(game.background_image)
                    .with_link(game.slug.map(|s| format!("https://rawg.io/games/{s}")))
                    .with_published_at(game.released.as_deref().and_then(parse_release_date));
                if let Some(rating) = game.rating {
                    record = record.with_body(format!("Rating {rating:.1}"));
                }
                record
            })
            .collect())
    }
}

fn parse_release_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Battle royale news (Fortnite API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NewsResponse {
    data: Option<NewsData>,
}

#[derive(Debug, Deserialize)]
struct NewsData {
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    motds: Vec<Motd>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Motd {
    title: String,
    body: Option<String>,
    image: Option<String>,
    tile_image: Option<String>,
}

/// In-game news messages
pub struct BattleRoyaleNews {
    http: HttpSource,
    api_key: String,
}

impl BattleRoyaleNews {
    pub const DEFAULT_BASE_URL: &'static str = "https://fortnite-api.com";

    pub fn new(http: HttpSource, api_key: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for BattleRoyaleNews {
    fn name(&self) -> &str {
        "br-news"
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        let options = FetchOptions::default().header("authorization", &self.api_key);
        let news: NewsResponse = self
            .http
            .get_json(self.name(), "/v2/news/br", &options)
            .await?;

        let Some(data) = news.data else {
            return Ok(vec![]);
        };
        let published_at = data.date;

        Ok(data
            .motds
            .into_iter()
            .map(|motd| {
                let mut record = SourceRecord::new(self.name(), motd.title)
                    .with_image(motd.image.or(motd.tile_image))
                    .with_published_at(published_at);
                if let Some(body) = motd.body {
                    record = record.with_body(body);
                }
                record
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Upcoming esports matches (PandaScore)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Match {
    name: String,
    begin_at: Option<DateTime<Utc>>,
    league: Option<Named>,
    videogame: Option<Named>,
    official_stream_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
    image_url: Option<String>,
}

/// Upcoming matches across esports titles
pub struct EsportsMatches {
    http: HttpSource,
    token: String,
    per_page: u32,
}

impl EsportsMatches {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.pandascore.co";

    pub fn new(http: HttpSource, token: &str, per_page: u32) -> Self {
        Self {
            http,
            token: token.to_string(),
            per_page,
        }
    }
}

#[async_trait]
impl SourceAdapter for EsportsMatches {
    fn name(&self) -> &str {
        "esports"
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        let path = format!("/matches/upcoming?per_page={}", self.per_page);
        let options = FetchOptions::default().bearer(&self.token);
        let matches: Vec<Match> = self.http.get_json(self.name(), &path, &options).await?;

        Ok(matches
            .into_iter()
            .map(|m| {
                let context: Vec<&str> = [m.league.as_ref(), m.videogame.as_ref()]
                    .into_iter()
                    .flatten()
                    .map(|n| n.name.as_str())
                    .collect();

                let mut record = SourceRecord::new(self.name(), m.name.clone())
                    .with_image(m.league.as_ref().and_then(|l| l.image_url.clone()))
                    .with_link(m.official_stream_url)
                    .with_published_at(m.begin_at);
                if !context.is_empty() {
                    record = record.with_body(context.join(" · "));
                }
                record
            })
            .collect())
    }
}
