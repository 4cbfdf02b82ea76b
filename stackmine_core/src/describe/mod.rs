//! Bundle naming and summaries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cluster::Bundle;
use crate::item::Item;

mod llm;
mod template;

pub use llm::LlmDescriber;
pub use template::{DEFAULT_SUMMARY, STOP_WORDS, TemplateDescriber, title_case};

/// A named, summarized bundle as persisted to `bundles.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDescription {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub items: Vec<Item>,
    pub summary: String,
    pub use_cases: Vec<String>,
}

#[async_trait]
pub trait BundleDescriber: Send + Sync {
    /// Describe one bundle; a pure function of its item list.
    async fn describe(&self, bundle: &Bundle) -> BundleDescription;
}

/// Describe every bundle in order, one call per bundle.
pub async fn describe_all<D>(describer: &D, bundles: &[Bundle]) -> Vec<BundleDescription>
where
    D: BundleDescriber + ?Sized,
{
    info!("Describing {} bundles", bundles.len());
    let mut described = Vec::with_capacity(bundles.len());
    for bundle in bundles {
        described.push(describer.describe(bundle).await);
    }
    described
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn describe_all_keeps_bundle_order() {
        let bundles: Vec<Bundle> = [["docker", "kubernetes"], ["aws", "terraform"]]
            .into_iter()
            .map(|labels| {
                Bundle::from(labels.into_iter().map(Item::new).collect::<BTreeSet<_>>())
            })
            .collect();

        let described = describe_all(&TemplateDescriber, &bundles).await;

        let names: Vec<&str> = described.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Docker + Kubernetes", "Aws + Terraform"]);
        assert_eq!(described[1].items, bundles[1].items());
    }
}
