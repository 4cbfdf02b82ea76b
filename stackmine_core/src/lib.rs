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
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod cluster;
pub mod describe;
pub mod error;
pub mod extract;
pub mod item;
pub mod support;
pub mod util;

pub use cluster::{Bundle, BundleParams, build_bundles, jaccard};
pub use describe::{
    BundleDescriber, BundleDescription, LlmDescriber, TemplateDescriber, describe_all,
};
pub use error::{MineError, Result};
pub use extract::{ItemExtractor, KeywordExtractor, LlmExtractor, MatchMode, extract_all};
pub use item::{Document, ExtractedDocument, Item, ItemPair, ItemSet, item_set};
pub use support::{PairSupport, SingletonSupport, SupportStats, count_support};
pub use util::content_hash;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// Ask the provider to constrain the reply to a JSON object.
    pub json_response: bool,
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<LLMResponse>;
    fn get_default_model(&self) -> &str;
}

#[async_trait]
impl<P: LLMProvider + ?Sized> LLMProvider for std::sync::Arc<P> {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<LLMResponse> {
        (**self).chat(request).await
    }

    fn get_default_model(&self) -> &str {
        (**self).get_default_model()
    }
}
