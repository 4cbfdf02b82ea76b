//! Subreddit listings through Reddit's public JSON endpoint.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use stackmine_core::Document;
use std::time::Duration;
use tracing::debug;

use crate::{DocumentSource, http_client};

const BASE_URL: &str = "https://www.reddit.com";
const TIMEOUT: Duration = Duration::from_secs(20);

pub struct RedditSource {
    client: Client,
    subreddit: String,
    limit: usize,
}

impl RedditSource {
    /// `subreddit` may be given as `r/devops` or `devops`.
    pub fn new(subreddit: &str, limit: usize) -> Result<Self> {
        Ok(Self {
            client: http_client(TIMEOUT)?,
            subreddit: normalize_subreddit(subreddit),
            limit,
        })
    }

    #[must_use]
    pub fn listing_url(&self) -> String {
        format!("{BASE_URL}/{}/.json", self.subreddit)
    }
}

fn normalize_subreddit(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.starts_with("r/") {
        trimmed.to_string()
    } else {
        format!("r/{trimmed}")
    }
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_f64()
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
}

/// Map a listing response to documents. Missing fields become empty strings.
#[must_use]
pub fn parse_listing(listing: &Value) -> Vec<Document> {
    let Some(children) = listing["data"]["children"].as_array() else {
        return Vec::new();
    };

    children
        .iter()
        .map(|child| {
            let post = &child["data"];
            let text = |key: &str| post[key].as_str().unwrap_or_default().to_string();
            Document {
                source: "reddit".to_string(),
                subreddit: post["subreddit"].as_str().map(ToString::to_string),
                title: text("title"),
                body: text("selftext"),
                url: format!("{BASE_URL}{}", text("permalink")),
                posted_at: timestamp(&post["created_utc"]),
            }
        })
        .collect()
}

#[async_trait]
impl DocumentSource for RedditSource {
    async fn fetch(&self) -> Result<Vec<Document>> {
        let url = self.listing_url();
        debug!("GET {url}?limit={}", self.limit);

        let listing = self
            .client
            .get(&url)
            .query(&[("limit", self.limit)])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(parse_listing(&listing))
    }

    fn label(&self) -> String {
        format!("reddit:{}", self.subreddit)
    }
}
