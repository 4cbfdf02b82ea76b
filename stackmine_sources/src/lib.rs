#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use stackmine_core::Document;
use std::time::Duration;
use tracing::info;

pub mod reddit;
pub mod stackoverflow;

pub use reddit::RedditSource;
pub use stackoverflow::StackOverflowSource;

pub const USER_AGENT: &str = "stackmine-bundle-miner/1.0";

/// A public feed of developer documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Document>>;

    /// Short label for logs, e.g. `reddit:r/devops`.
    fn label(&self) -> String;
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

/// Fetch every source in order and concatenate their documents.
///
/// A failing source aborts the crawl.
pub async fn crawl(sources: &[Box<dyn DocumentSource>]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for source in sources {
        let label = source.label();
        let fetched = source
            .fetch()
            .await
            .with_context(|| format!("Failed to fetch {label}"))?;
        info!("Fetched {} documents from {label}", fetched.len());
        documents.extend(fetched);
    }
    Ok(documents)
}
