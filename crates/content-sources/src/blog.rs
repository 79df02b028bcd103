//! WordPress JSON posts feed

use async_trait::async_trait;
use bounded_fetch::FetchOptions;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::adapter::{HttpSource, SourceAdapter};
use crate::error::Result;
use crate::record::SourceRecord;
use crate::text::{strip_tags, truncate_chars};

const EXCERPT_CHARS: usize = 180;

#[derive(Debug, Deserialize)]
struct Post {
    date: Option<String>,
    link: Option<String>,
    title: Rendered,
    #[serde(default)]
    excerpt: Rendered,
    jetpack_featured_media_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

/// Latest posts of a WordPress blog
pub struct BlogFeed {
    http: HttpSource,
    per_page: u32,
    name: String,
}

impl BlogFeed {
    pub const DEFAULT_BASE_URL: &'static str = "https://blog.roblox.com";

    pub fn new(http: HttpSource, name: &str, per_page: u32) -> Self {
        Self {
            http,
            per_page,
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for BlogFeed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        let path = format!("/wp-json/wp/v2/posts?per_page={}", self.per_page);
        let posts: Vec<Post> = self
            .http
            .get_json(&self.name, &path, &FetchOptions::default())
            .await?;

        Ok(posts
            .into_iter()
            .map(|post| to_record(&self.name, post))
            .collect())
    }
}

fn to_record(source: &str, post: Post) -> SourceRecord {
    let excerpt = strip_tags(&post.excerpt.rendered);
    let excerpt = truncate_chars(excerpt.trim(), EXCERPT_CHARS);

    let mut record = SourceRecord::new(source, strip_tags(&post.title.rendered))
        .with_link(post.link)
        .with_image(post.jetpack_featured_media_url)
        .with_published_at(post.date.as_deref().and_then(parse_wp_date));
    if !excerpt.is_empty() {
        record = record.with_body(excerpt);
    }
    record
}

/// WordPress `date` has no offset; `date_gmt` is not always exposed
fn parse_wp_date(date: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
