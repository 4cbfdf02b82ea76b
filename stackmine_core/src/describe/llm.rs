use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::{BundleDescriber, BundleDescription, TemplateDescriber};
use crate::cluster::Bundle;
use crate::item::Item;
use crate::util::parse_json_object;
use crate::{ChatMessage, ChatRequest, LLMProvider};

const SYSTEM_PROMPT: &str =
    "You name and summarize technology bundles for a product research team.";

const INSTRUCTIONS: &str = "Propose a short bundle name (<=6 words), a 2-3 sentence summary, \
    and 2-4 practical use cases. JSON keys: name, summary, use_cases.";

const FALLBACK_USE_CASES: &[&str] = &["learning path", "starter stack"];

/// Model-backed describer; gaps and failures are filled from the template.
pub struct LlmDescriber<P> {
    provider: P,
    model: String,
}

impl<P: LLMProvider> LlmDescriber<P> {
    pub fn new(provider: P, model: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| provider.get_default_model().to_string());
        Self { provider, model }
    }

    async fn ask(&self, bundle: &Bundle) -> anyhow::Result<BundleDescription> {
        let items: Vec<&str> = bundle.items().iter().map(Item::as_str).collect();
        let prompt = json!({ "items": items, "instructions": INSTRUCTIONS });
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(prompt.to_string()),
            ],
            temperature: 0.4,
            json_response: true,
        };

        let response = self.provider.chat(&request).await?;
        let reply = parse_json_object(&response.content)?;

        let text = |key: &str| {
            reply[key]
                .as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };
        let use_cases: Vec<String> = reply["use_cases"]
            .as_array()
            .map(|cases| {
                cases
                    .iter()
                    .filter_map(serde_json::Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut description = TemplateDescriber::describe_with(bundle, FALLBACK_USE_CASES);
        if let Some(name) = text("name") {
            description.name = name;
        }
        if let Some(summary) = text("summary") {
            description.summary = summary;
        }
        if !use_cases.is_empty() {
            description.use_cases = use_cases;
        }
        Ok(description)
    }
}

#[async_trait]
impl<P: LLMProvider> BundleDescriber for LlmDescriber<P> {
    async fn describe(&self, bundle: &Bundle) -> BundleDescription {
        match self.ask(bundle).await {
            Ok(description) => description,
            Err(e) => {
                warn!("Summarizing bundle {} failed: {e}. Using template", bundle.id());
                TemplateDescriber::describe_with(bundle, FALLBACK_USE_CASES)
            }
        }
    }
}
