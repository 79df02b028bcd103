//! Link-aggregation "hot posts" feed

use async_trait::async_trait;
use bounded_fetch::FetchOptions;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::adapter::{HttpSource, SourceAdapter};
use crate::error::Result;
use crate::record::SourceRecord;
use crate::text::truncate_chars;

const SITE_URL: &str = "https://reddit.com";
const BODY_CHARS: usize = 150;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    #[serde(default)]
    selftext: String,
    permalink: Option<String>,
    url_overridden_by_dest: Option<String>,
    thumbnail: Option<String>,
    author: Option<String>,
    created_utc: Option<f64>,
}

/// Hot posts from one subreddit
pub struct HotPosts {
    http: HttpSource,
    subreddit: String,
    limit: u32,
    name: String,
}

impl HotPosts {
    pub const DEFAULT_BASE_URL: &'static str = "https://www.reddit.com";

    pub fn new(http: HttpSource, subreddit: &str, limit: u32) -> Self {
        Self {
            http,
            subreddit: subreddit.to_string(),
            limit,
            name: format!("r/{subreddit}"),
        }
    }

    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }
}

#[async_trait]
impl SourceAdapter for HotPosts {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        let path = format!(
            "/r/{}/hot.json?limit={}",
            urlencoding::encode(&self.subreddit),
            self.limit
        );
        let listing: Listing = self
            .http
            .get_json(&self.name, &path, &FetchOptions::default())
            .await?;

        let records: Vec<SourceRecord> = listing
            .data
            .children
            .into_iter()
            .map(|child| to_record(&self.name, child.data))
            .collect();

        debug!(source = %self.name, count = records.len(), "Loaded hot posts");
        Ok(records)
    }
}

fn to_record(source: &str, post: Post) -> SourceRecord {
    // Thumbnails can be placeholders like "self" or "default"
    let image = post
        .url_overridden_by_dest
        .filter(|u| is_image_url(u))
        .or(post.thumbnail.filter(|u| u.starts_with("http")));

    let mut record = SourceRecord::new(source, post.title)
        .with_image(image)
        .with_link(post.permalink.map(|p| format!("{SITE_URL}{p}")))
        .with_author(post.author)
        .with_published_at(post.created_utc.and_then(from_epoch_secs));

    if !post.selftext.is_empty() {
        record = record.with_body(truncate_chars(&post.selftext, BODY_CHARS));
    }
    record
}

fn is_image_url(url: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url).to_ascii_lowercase();
    url.starts_with("http")
        && [".jpg", ".jpeg", ".png", ".gif", ".webp"]
            .iter()
            .any(|ext| path.ends_with(ext))
}

fn from_epoch_secs(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis((secs * 1000.0) as i64)
}
