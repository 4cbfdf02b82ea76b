//! Item extraction: turning one document into a set of items.
//!
//! Extractors never fail from the caller's point of view. A broken model call
//! degrades to keyword matching, and a document with no recognizable items
//! yields an empty set.

use async_trait::async_trait;
use tracing::info;

use crate::item::{Document, ExtractedDocument, ItemSet};

mod keyword;
mod llm;

pub use keyword::{DEFAULT_HINTS, KeywordExtractor, MatchMode};
pub use llm::LlmExtractor;

#[async_trait]
pub trait ItemExtractor: Send + Sync {
    /// Items mentioned in `document`. Independent of any other document.
    async fn extract(&self, document: &Document) -> ItemSet;

    fn name(&self) -> &str;
}

/// Extract every document in order, one call per document.
pub async fn extract_all<E>(extractor: &E, documents: &[Document]) -> Vec<ExtractedDocument>
where
    E: ItemExtractor + ?Sized,
{
    info!(
        "Extracting items from {} documents with {}",
        documents.len(),
        extractor.name()
    );

    let mut extracted = Vec::with_capacity(documents.len());
    for document in documents {
        let items = extractor.extract(document).await;
        extracted.push(ExtractedDocument {
            url: document.url.clone(),
            items,
        });
    }

    let total: usize = extracted.iter().map(|e| e.items.len()).sum();
    info!("Extracted {total} items");
    extracted
}
