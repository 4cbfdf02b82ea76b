//! Items, item pairs and the documents they are extracted from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::MineError;

/// A normalized technology label (trimmed, lowercase).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Item(String);

impl Item {
    /// Normalize a raw label into an item.
    ///
    /// Returns `None` when nothing is left after trimming.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let label = raw.trim().to_lowercase();
        if label.is_empty() {
            None
        } else {
            Some(Self(label))
        }
    }

    /// Normalize a label that is known to be non-empty, such as a literal.
    ///
    /// Use [`Item::parse`] for untrusted input. An empty label is a bug in
    /// the caller and panics in debug builds.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        debug_assert!(!label.is_empty(), "empty item label {raw:?}");
        Self(label)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Item {
    type Error = MineError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| MineError::InvalidInput("empty item label".into()))
    }
}

impl From<Item> for String {
    fn from(item: Item) -> Self {
        item.0
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Item {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unordered pair of distinct items, stored as `(low, high)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemPair {
    low: Item,
    high: Item,
}

impl ItemPair {
    /// Build the canonical pair for `a` and `b`. `None` if they are equal.
    #[must_use]
    pub fn new(a: Item, b: Item) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[must_use]
    pub const fn low(&self) -> &Item {
        &self.low
    }

    #[must_use]
    pub const fn high(&self) -> &Item {
        &self.high
    }

}

impl fmt::Display for ItemPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.low, self.high)
    }
}

/// The deduplicated items attributed to one document.
pub type ItemSet = BTreeSet<Item>;

/// Collect raw labels into a document item set, dropping empty labels.
pub fn item_set<I, S>(labels: I) -> ItemSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter_map(|label| Item::parse(label.as_ref()))
        .collect()
}

/// A short developer document fetched from a public source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl Document {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            subreddit: None,
            title: title.into(),
            body: body.into(),
            url: String::new(),
            posted_at: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Title and body joined by a newline, the text extractors look at.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }
}

/// Items extracted from one document, keyed by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub url: String,
    pub items: ItemSet,
}
