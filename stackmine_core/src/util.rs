//! Hashing and text helpers shared by the collaborators.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Compute a SHA-256 content hash: `kind`, a colon, then `content`,
/// hex-encoded.
#[must_use]
pub fn content_hash(kind: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// First `{` through last `}`, across lines.
static JSON_OBJECT: OnceLock<Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn json_object() -> &'static Regex {
    JSON_OBJECT.get_or_init(|| {
        Regex::new(r"(?s)\{.*\}").expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Parse the outermost JSON object in a model reply.
///
/// Models asked for JSON sometimes wrap it in prose or a code fence, so
/// everything from the first `{` to the last `}` is tried.
pub fn parse_json_object(reply: &str) -> anyhow::Result<serde_json::Value> {
    let raw = json_object()
        .find(reply)
        .map(|m| m.as_str())
        .ok_or_else(|| anyhow::anyhow!("No JSON object in reply"))?;
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        anyhow::bail!("Reply JSON is not an object");
    }
    Ok(value)
}

/// Truncate to at most `max_chars` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_hash() {
        let h1 = content_hash("bundle", "docker,kubernetes");
        let h2 = content_hash("bundle", "docker,kubernetes");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // SHA-256 hex length
    }

    #[test]
    fn different_inputs_different_hashes() {
        let h1 = content_hash("bundle", "docker");
        let h2 = content_hash("document", "docker");
        assert_ne!(h1, h2);
    }

    #[test]
    fn finds_fenced_json() {
        let reply = "Sure!\n```json\n{\"items\": [\"rust\"]}\n```";
        let value = parse_json_object(reply).unwrap_or_default();
        assert_eq!(value["items"][0], "rust");
        assert!(parse_json_object("no json here").is_err());
        assert!(parse_json_object("{not json}").is_err());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 0), "");
    }
}
