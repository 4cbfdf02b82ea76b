//! Stack Overflow questions through the Stack Exchange search API.

use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;
use stackmine_core::Document;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{DocumentSource, http_client};

const SEARCH_URL: &str = "https://api.stackexchange.com/2.3/search/advanced";
const TIMEOUT: Duration = Duration::from_secs(25);

/// Search filter that includes question bodies.
const BODY_FILTER: &str = "!)rTkra3bK2SYPDk7k2Fq*EIVdQn3c2kzFj";

pub struct StackOverflowSource {
    client: Client,
    tag: String,
    pagesize: usize,
}

impl StackOverflowSource {
    pub fn new(tag: &str, pagesize: usize) -> Result<Self> {
        Ok(Self {
            client: http_client(TIMEOUT)?,
            tag: tag.trim().to_string(),
            pagesize,
        })
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("order", "desc".to_string()),
            ("sort", "relevance".to_string()),
            ("tagged", self.tag.clone()),
            ("site", "stackoverflow".to_string()),
            ("filter", BODY_FILTER.to_string()),
            ("pagesize", self.pagesize.to_string()),
        ]
    }
}

/// Map a search response to documents.
///
/// The body is the first non-empty of `body_markdown`, `body`, `excerpt`.
#[must_use]
pub fn parse_search(response: &Value) -> Vec<Document> {
    let Some(items) = response["items"].as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| {
            let text = |key: &str| item[key].as_str().filter(|s| !s.is_empty());
            Document {
                source: "stackoverflow".to_string(),
                subreddit: None,
                title: text("title").unwrap_or_default().to_string(),
                body: text("body_markdown")
                    .or_else(|| text("body"))
                    .or_else(|| text("excerpt"))
                    .unwrap_or_default()
                    .to_string(),
                url: text("link").unwrap_or_default().to_string(),
                posted_at: item["creation_date"]
                    .as_i64()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            }
        })
        .collect()
}

#[async_trait]
impl DocumentSource for StackOverflowSource {
    async fn fetch(&self) -> Result<Vec<Document>> {
        debug!("GET {SEARCH_URL} tagged={}", self.tag);

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&self.query())
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        if let Some(remaining) = response["quota_remaining"]
            .as_u64()
            .filter(|&remaining| remaining < 10)
        {
            warn!("Stack Exchange quota nearly exhausted: {remaining} requests left");
        }

        Ok(parse_search(&response))
    }

    fn label(&self) -> String {
        format!("stackoverflow:{}", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_prefers_markdown_then_html_then_excerpt() {
        let response = json!({
            "items": [
                {
                    "title": "A",
                    "body_markdown": "md",
                    "body": "<p>html</p>",
                    "link": "https://so/a"
                },
                { "title": "B", "body_markdown": "", "body": "<p>html</p>" },
                { "title": "C", "excerpt": "short", "creation_date": 1_600_000_000 },
                { "title": "D" }
            ],
            "quota_remaining": 250
        });

        let docs = parse_search(&response);
        let bodies: Vec<&str> = docs.iter().map(|d| d.body.as_str()).collect();
        assert_eq!(bodies, ["md", "<p>html</p>", "short", ""]);
        assert_eq!(docs[0].url, "https://so/a");
        assert_eq!(docs[2].posted_at.map(|t| t.timestamp()), Some(1_600_000_000));
        assert!(docs.iter().all(|d| d.source == "stackoverflow"));
    }

    #[test]
    fn query_carries_tag_and_pagesize() {
        let source = StackOverflowSource::new(" python ", 20);
        assert!(source.is_ok());
        if let Ok(source) = source {
            let query = source.query();
            assert!(query.contains(&("tagged", "python".to_string())));
            assert!(query.contains(&("pagesize", "20".to_string())));
            assert_eq!(source.label(), "stackoverflow:python");
        }
    }

    #[test]
    fn error_payload_yields_nothing() {
        assert!(parse_search(&json!({ "error_id": 502 })).is_empty());
    }
}
