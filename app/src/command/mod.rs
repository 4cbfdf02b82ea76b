//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input type, so the
//! dispatch in `main` is monomorphized and every command can be exercised on
//! its own.

use std::sync::Arc;

use anyhow::Result;
use stackmine_config::Config;
use stackmine_core::{
    Bundle, BundleDescriber, BundleParams, Document, ItemExtractor, KeywordExtractor,
    LlmDescriber, LlmExtractor, TemplateDescriber, build_bundles, count_support, extract_all,
};
use stackmine_providers::{OpenAiProvider, RetryPolicy};
use stackmine_sources::{DocumentSource, RedditSource, StackOverflowSource};
use stackmine_store::{BUNDLES_RAW, EXTRACTED_ITEMS, OutputDir};
use tracing::info;

mod crawl;
mod full;
mod info;
mod init;
mod mine;
mod summarize;
mod version;

pub use crawl::{CrawlInput, CrawlStrategy};
pub use full::{FullInput, FullStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use mine::{MineInput, MineStrategy};
pub use summarize::{SummarizeInput, SummarizeStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> Result<()>;
}

/// Loaded configuration plus the directory artifacts go to.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: Config,
    pub out: OutputDir,
}

/// Optional CLI overrides for the mining parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamOverrides {
    pub min_support: Option<u32>,
    pub min_pair: Option<u32>,
    pub top_k: Option<usize>,
}

impl ParamOverrides {
    #[must_use]
    pub fn apply(self, base: BundleParams) -> BundleParams {
        BundleParams {
            min_support: self.min_support.unwrap_or(base.min_support),
            min_pair: self.min_pair.unwrap_or(base.min_pair),
            top_k: self.top_k.unwrap_or(base.top_k),
            ..base
        }
    }
}

/// Crawl targets; `None` falls back to the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    pub reddit: Option<Vec<String>>,
    pub so_tags: Option<Vec<String>>,
    pub limit: Option<usize>,
}

fn build_sources(config: &Config, args: &SourceArgs) -> Result<Vec<Box<dyn DocumentSource>>> {
    let reddit = args.reddit.as_ref().unwrap_or(&config.sources.reddit);
    let so_tags = args.so_tags.as_ref().unwrap_or(&config.sources.so_tags);
    let limit = args.limit.unwrap_or(config.sources.limit);

    let mut sources: Vec<Box<dyn DocumentSource>> = Vec::new();
    for sub in reddit {
        sources.push(Box::new(RedditSource::new(sub, limit)?));
    }
    for tag in so_tags {
        sources.push(Box::new(StackOverflowSource::new(tag, limit)?));
    }
    Ok(sources)
}

fn provider(config: &Config) -> Result<Option<Arc<OpenAiProvider>>> {
    let settings = &config.providers.openai;
    let Some(api_key) = settings.api_key() else {
        info!("No API key configured, using keyword extraction and template summaries");
        return Ok(None);
    };
    let provider = OpenAiProvider::new(api_key.to_string())?
        .with_base_url(settings.base_url.clone())
        .with_default_model(settings.model.clone())
        .with_retry(RetryPolicy::from_secs(&settings.retry_delays_secs));
    Ok(Some(Arc::new(provider)))
}

/// Model-backed extractor when a key is configured, keywords otherwise.
fn build_extractor(config: &Config, model: Option<String>) -> Result<Box<dyn ItemExtractor>> {
    let keywords = KeywordExtractor::new().with_mode(config.extraction.match_mode);
    let extractor: Box<dyn ItemExtractor> = match provider(config)? {
        Some(provider) => Box::new(LlmExtractor::new(provider, model).with_fallback(keywords)),
        None => Box::new(keywords),
    };
    Ok(extractor)
}

/// Model-backed describer when a key is configured, templates otherwise.
fn build_describer(config: &Config, model: Option<String>) -> Result<Box<dyn BundleDescriber>> {
    let describer: Box<dyn BundleDescriber> = match provider(config)? {
        Some(provider) => Box::new(LlmDescriber::new(provider, model)),
        None => Box::new(TemplateDescriber),
    };
    Ok(describer)
}

/// Statistics of a finished mining stage, for the closing summary line.
#[derive(Debug, Clone, Copy)]
struct MineSummary {
    items: usize,
}

/// Extract, count and cluster; writes `extracted_items.json` and
/// `bundles_raw.json`.
async fn mine_documents(
    ctx: &RunContext,
    extractor: &dyn ItemExtractor,
    documents: &[Document],
    params: &BundleParams,
) -> Result<(Vec<Bundle>, MineSummary)> {
    let extracted = extract_all(extractor, documents).await;
    ctx.out.save(EXTRACTED_ITEMS, &extracted)?;

    let stats = count_support(extracted.iter().map(|e| e.items.iter().cloned()));
    info!(
        "Support: {} documents, {} items, {} pairs",
        stats.documents(),
        stats.singleton().len(),
        stats.pairs().len()
    );

    let bundles = build_bundles(&stats, params)?;
    ctx.out.save(BUNDLES_RAW, &bundles)?;

    let items = extracted.iter().map(|e| e.items.len()).sum();
    Ok((bundles, MineSummary { items }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackmine_core::MatchMode;

    #[test]
    fn overrides_replace_only_given_params() {
        let base = BundleParams::default();
        let params = ParamOverrides {
            min_pair: Some(2),
            ..ParamOverrides::default()
        }
        .apply(base);
        assert_eq!(params.min_pair, 2);
        assert_eq!(params.min_support, base.min_support);
        assert_eq!(params.top_k, base.top_k);
    }

    #[test]
    fn sources_follow_config_unless_overridden() {
        let config = Config::default();
        let defaults = build_sources(&config, &SourceArgs::default()).unwrap_or_default();
        let labels: Vec<String> = defaults.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["reddit:r/devops", "stackoverflow:python"]);

        let args = SourceArgs {
            reddit: Some(Vec::new()),
            so_tags: Some(vec!["rust".into(), "go".into()]),
            limit: Some(5),
        };
        let custom = build_sources(&config, &args).unwrap_or_default();
        let labels: Vec<String> = custom.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["stackoverflow:rust", "stackoverflow:go"]);
    }

    #[test]
    fn keyword_extractor_without_key() {
        let extractor = build_extractor(&Config::default(), None);
        assert!(extractor.is_ok_and(|e| e.name() == "keyword"));
    }

    #[tokio::test]
    async fn configured_match_mode_reaches_keyword_extractor() {
        let document = Document::new("reddit", "Django behind Nginx", "");

        let substring =
            build_extractor(&Config::default(), None).unwrap_or_else(|e| panic!("{e}"));
        let items = substring.extract(&document).await;
        assert!(items.iter().any(|item| item.as_str() == "go"));

        let mut config = Config::default();
        config.extraction.match_mode = MatchMode::Token;
        let token = build_extractor(&config, None).unwrap_or_else(|e| panic!("{e}"));
        let items = token.extract(&document).await;
        assert_eq!(items.iter().map(|i| i.as_str()).collect::<Vec<_>>(), ["django"]);
    }

    #[tokio::test]
    async fn mining_writes_artifacts() {
        let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let ctx = RunContext {
            config: Config::default(),
            out: OutputDir::new(tmp.path()).unwrap_or_else(|e| panic!("{e}")),
        };
        let documents: Vec<Document> = (0..3)
            .map(|i| Document::new("reddit", "Terraform on AWS", "").with_url(format!("u{i}")))
            .collect();

        let result = mine_documents(
            &ctx,
            &KeywordExtractor::new(),
            &documents,
            &BundleParams::default(),
        )
        .await;
        let (bundles, summary) = result.unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(summary.items, 6);
        assert_eq!(bundles.len(), 1);
        assert!(ctx.out.path(EXTRACTED_ITEMS).is_file());
        assert!(ctx.out.path(BUNDLES_RAW).is_file());
    }
}
