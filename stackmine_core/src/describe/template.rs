use async_trait::async_trait;

use super::{BundleDescriber, BundleDescription};
use crate::cluster::Bundle;
use crate::item::Item;

/// Words never used in a generated bundle name.
pub const STOP_WORDS: &[&str] = &[
    "and", "or", "with", "for", "to", "from", "in", "on", "of", "the", "a", "an", "using", "via",
    "as",
];

pub const DEFAULT_SUMMARY: &str = "Commonly co-mentioned tools in public developer threads.";

const DEFAULT_USE_CASES: &[&str] = &["learning path", "starter stack", "tool comparison"];

/// Uppercase every letter that follows a non-letter, lowercase the rest.
///
/// `"node.js"` becomes `"Node.Js"` and `"spring boot"` becomes `"Spring Boot"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

/// Deterministic describer used without a model, and as the model fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDescriber;

impl TemplateDescriber {
    /// Up to three leading non-stop-word items, title-cased and joined by `" + "`.
    #[must_use]
    pub fn name(items: &[Item]) -> String {
        if items.is_empty() {
            return "Bundle".to_string();
        }
        items
            .iter()
            .map(Item::as_str)
            .filter(|item| !STOP_WORDS.contains(item))
            .take(3)
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" + ")
    }

    #[must_use]
    pub fn describe_with(bundle: &Bundle, use_cases: &[&str]) -> BundleDescription {
        BundleDescription {
            id: bundle.id(),
            name: Self::name(bundle.items()),
            items: bundle.items().to_vec(),
            summary: DEFAULT_SUMMARY.to_string(),
            use_cases: use_cases.iter().map(ToString::to_string).collect(),
        }
    }
}

#[async_trait]
impl BundleDescriber for TemplateDescriber {
    async fn describe(&self, bundle: &Bundle) -> BundleDescription {
        Self::describe_with(bundle, DEFAULT_USE_CASES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(items: &[&str]) -> Bundle {
        items
            .iter()
            .map(|s| Item::new(s))
            .collect::<std::collections::BTreeSet<_>>()
            .into()
    }

    #[test]
    fn title_case_follows_letter_boundaries() {
        assert_eq!(title_case("node.js"), "Node.Js");
        assert_eq!(title_case("spring boot"), "Spring Boot");
        assert_eq!(title_case("c#"), "C#");
        assert_eq!(title_case("k8s"), "K8S");
    }

    #[test]
    fn name_uses_first_three_items() {
        let b = bundle(&["docker", "helm", "kubernetes", "terraform"]);
        assert_eq!(TemplateDescriber::name(b.items()), "Docker + Helm + Kubernetes");
        assert_eq!(TemplateDescriber::name(&[]), "Bundle");
    }

    #[test]
    fn name_skips_stop_words() {
        let b = bundle(&["and", "redis", "the"]);
        assert_eq!(TemplateDescriber::name(b.items()), "Redis");
    }

    #[tokio::test]
    async fn template_description() {
        let b = bundle(&["kafka", "spark"]);
        let d = TemplateDescriber.describe(&b).await;
        assert_eq!(d.name, "Kafka + Spark");
        assert_eq!(d.summary, DEFAULT_SUMMARY);
        assert_eq!(d.use_cases, DEFAULT_USE_CASES);
        assert_eq!(d.id, b.id());
    }
}
