//! Random player profiles

use async_trait::async_trait;
use bounded_fetch::FetchOptions;
use serde::Deserialize;

use crate::adapter::{HttpSource, SourceAdapter};
use crate::error::Result;
use crate::record::SourceRecord;

#[derive(Debug, Deserialize)]
struct ProfilesResponse {
    results: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    name: Name,
    login: Login,
    picture: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct Name {
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct Login {
    username: String,
}

#[derive(Debug, Deserialize)]
struct Picture {
    large: Option<String>,
}

pub struct ProfileGenerator {
    http: HttpSource,
    count: u32,
}

impl ProfileGenerator {
    pub const DEFAULT_BASE_URL: &'static str = "https://randomuser.me";

    pub fn new(http: HttpSource, count: u32) -> Self {
        Self { http, count }
    }
}

#[async_trait]
impl SourceAdapter for ProfileGenerator {
    fn name(&self) -> &str {
        "profiles"
    }

    async fn load(&self) -> Result<Vec<SourceRecord>> {
        let path = format!("/api/?results={}", self.count);
        let data: ProfilesResponse = self
            .http
            .get_json(self.name(), &path, &FetchOptions::default())
            .await?;

        Ok(data
            .results
            .into_iter()
            .map(|user| {
                SourceRecord::new("profiles", format!("{} {}", user.name.first, user.name.last))
                    .with_body(format!("@{}", user.login.username))
                    .with_image(user.picture.and_then(|p| p.large))
            })
            .collect())
    }
}
