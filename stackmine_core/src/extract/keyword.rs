use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ItemExtractor;
use crate::item::{Document, Item, ItemSet};

/// Technologies recognized by the keyword extractor.
pub const DEFAULT_HINTS: &[&str] = &[
    "python", "java", "node.js", "node", "javascript", "typescript", "react", "vue", "angular",
    "svelte", "next.js", "nuxt", "django", "flask", "fastapi", "spring", "spring boot", "kotlin",
    "swift", "go", "golang", "rust", "dotnet", "c#", "c++", "docker", "kubernetes", "helm",
    "terraform", "ansible", "aws", "azure", "gcp", "linux", "postgres", "mysql", "mongodb",
    "redis", "rabbitmq", "kafka", "elasticsearch", "clickhouse", "spark", "hadoop", "airflow",
    "dbt", "supabase", "firebase", "tailwind", "bootstrap", "storybook", "vitest", "jest",
    "pytest", "cypress", "playwright",
];

const TOKEN_TRIM: &[char] = &['.', ',', ':', ';', '(', ')', '[', ']', '{', '}', '!', '"', '\''];

/// How a hint has to appear in the text to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Anywhere in the lowercased text, even inside a longer word.
    #[default]
    Substring,
    /// As whole whitespace-separated tokens, with surrounding punctuation
    /// stripped. Multi-word hints must appear as consecutive tokens.
    Token,
}

/// Deterministic extractor matching a fixed list of hints.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    hints: Vec<Item>,
    mode: MatchMode,
}

impl KeywordExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::with_hints(DEFAULT_HINTS.iter().copied())
    }

    pub fn with_hints<I, S>(hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hints: hints
                .into_iter()
                .filter_map(|hint| Item::parse(hint.as_ref()))
                .collect(),
            mode: MatchMode::default(),
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Match hints against raw text.
    #[must_use]
    pub fn extract_text(&self, text: &str) -> ItemSet {
        let lowered = text.to_lowercase();
        match self.mode {
            MatchMode::Substring => self
                .hints
                .iter()
                .filter(|hint| lowered.contains(hint.as_str()))
                .cloned()
                .collect(),
            MatchMode::Token => {
                let tokens: Vec<&str> = lowered
                    .split_whitespace()
                    .map(|w| w.trim_matches(TOKEN_TRIM))
                    .filter(|w| !w.is_empty())
                    .collect();
                // Padded so " spring boot " only matches whole tokens.
                let joined = format!(" {} ", tokens.join(" "));
                self.hints
                    .iter()
                    .filter(|hint| joined.contains(&format!(" {hint} ")))
                    .cloned()
                    .collect()
            }
        }
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemExtractor for KeywordExtractor {
    async fn extract(&self, document: &Document) -> ItemSet {
        self.extract_text(&document.text())
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}
