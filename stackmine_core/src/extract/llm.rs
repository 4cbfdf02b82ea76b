use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ItemExtractor, KeywordExtractor};
use crate::item::{Document, ItemSet, item_set};
use crate::util::{parse_json_object, truncate_chars};
use crate::{ChatMessage, ChatRequest, LLMProvider};

const SYSTEM_PROMPT: &str = "Extract a list of atomic technologies/tools/libraries/frameworks \
    mentioned. Return ONLY JSON: {\"items\": [\"...\"]}. Keep 3-12 items; lowercase; concise.";

/// Longest document text sent to the model, in characters.
pub const MAX_INPUT_CHARS: usize = 6000;

/// Model-backed extractor that falls back to keyword matching.
pub struct LlmExtractor<P> {
    provider: P,
    model: String,
    fallback: KeywordExtractor,
}

impl<P: LLMProvider> LlmExtractor<P> {
    pub fn new(provider: P, model: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| provider.get_default_model().to_string());
        Self {
            provider,
            model,
            fallback: KeywordExtractor::new(),
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: KeywordExtractor) -> Self {
        self.fallback = fallback;
        self
    }

    async fn ask(&self, text: &str) -> anyhow::Result<ItemSet> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(text)],
            temperature: 0.2,
            json_response: true,
        };

        let response = self.provider.chat(&request).await?;
        let reply = parse_json_object(&response.content)?;
        let labels = reply["items"]
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Reply has no items array"))?
            .iter()
            .filter_map(label_of);

        Ok(item_set(labels))
    }
}

/// Scalars become labels (`3` as "3"); nulls and nested values are skipped.
fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::String(label) => Some(label.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[async_trait]
impl<P: LLMProvider> ItemExtractor for LlmExtractor<P> {
    async fn extract(&self, document: &Document) -> ItemSet {
        let full = document.text();
        let text = truncate_chars(&full, MAX_INPUT_CHARS);

        match self.ask(text).await {
            Ok(items) if !items.is_empty() => {
                debug!("Model extracted {} items from {}", items.len(), document.url);
                items
            }
            Ok(_) => {
                debug!("Model returned no items for {}, using keywords", document.url);
                self.fallback.extract_text(text)
            }
            Err(e) => {
                warn!("Extraction failed for {}: {e}. Using keywords", document.url);
                self.fallback.extract_text(text)
            }
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}
