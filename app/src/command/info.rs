use stackmine_config::{API_KEY_ENV, Config};

use super::RunContext;

/// Strategy for displaying the effective configuration.
///
/// The API key is masked; the output directory is the resolved one,
/// including any `--out` override.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = RunContext;

    async fn execute(&self, ctx: Self::Input) -> anyhow::Result<()> {
        let config = &ctx.config;

        println!("=== stackmine Configuration ===\n");

        println!("Config file: {}", Config::config_path()?.display());
        println!();

        println!("Provider:");
        let provider = &config.providers.openai;
        println!("  API Key: {}", mask_key(provider.api_key()));
        println!("  Base URL: {}", provider.base_url);
        println!("  Model: {}", provider.model);
        println!("  Retry Delays (s): {:?}", provider.retry_delays_secs);
        if provider.api_key().is_none() {
            println!("  (set {API_KEY_ENV} to enable model extraction and summaries)");
        }
        println!();

        println!("Mining:");
        println!("  Min Support: {}", config.mining.min_support);
        println!("  Min Pair: {}", config.mining.min_pair);
        println!("  Top K: {}", config.mining.top_k);
        println!("  Dedup Threshold: {}", config.mining.dedup_threshold);
        println!("  Keyword Match Mode: {:?}", config.extraction.match_mode);
        println!();

        println!("Sources:");
        println!("  Reddit: {}", list_or_none(&config.sources.reddit));
        println!("  Stack Overflow Tags: {}", list_or_none(&config.sources.so_tags));
        println!("  Limit: {}", config.sources.limit);
        println!();

        println!("Output: {}", ctx.out.root().display());

        Ok(())
    }
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(key) if key.chars().count() > 8 => {
            let head: String = key.chars().take(4).collect();
            let tail: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("{head}...{tail}")
        }
        Some(_) => "***".to_string(),
    }
}

fn list_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}
