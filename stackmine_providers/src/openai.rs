use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use stackmine_core::{ChatRequest, LLMProvider, LLMResponse, Usage};
use std::time::Duration;
use tracing::{debug, info};

use crate::retry::{RetryPolicy, is_transient, retry_with_backoff};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(40);

/// Client for OpenAI-compatible chat-completion endpoints.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    retry: RetryPolicy,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        info!("Creating OpenAiProvider");
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request_body(request: &ChatRequest) -> serde_json::Value {
        let mut body = json!({
            "model": request.model,
            "temperature": request.temperature,
            "messages": request.messages,
        });
        if request.json_response {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }

    /// Send a single request
    async fn try_send(&self, body: &serde_json::Value) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_response(&response)
    }
}

fn parse_response(response: &serde_json::Value) -> anyhow::Result<LLMResponse> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
        .to_string();

    let count = |u: &serde_json::Map<String, serde_json::Value>, key: &str| {
        u32::try_from(u.get(key).and_then(serde_json::Value::as_u64).unwrap_or(0)).unwrap_or(0)
    };
    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: count(u, "prompt_tokens"),
        completion_tokens: count(u, "completion_tokens"),
        total_tokens: count(u, "total_tokens"),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for OpenAiProvider {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<LLMResponse> {
        let body = Self::request_body(request);

        debug!("Sending chat request: model={}", request.model);

        let response =
            retry_with_backoff(|| self.try_send(&body), &self.retry, is_transient).await?;

        if let Some(usage) = &response.usage {
            debug!(
                "Chat response: {} prompt + {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }
        Ok(response)
    }

    fn get_default_model(&self) -> &str {
        &self.default_model
    }
}
