use stackmine_core::describe_all;
use tracing::info;

use super::crawl::CrawlStrategy;
use super::{
    ParamOverrides, RunContext, SourceArgs, build_describer, build_extractor, mine_documents,
};

/// Input parameters for the Full command strategy.
#[derive(Debug, Clone)]
pub struct FullInput {
    pub ctx: RunContext,
    pub sources: SourceArgs,
    pub model: Option<String>,
    pub params: ParamOverrides,
}

/// Strategy for the whole pipeline: crawl, extract, mine, summarize.
///
/// Every intermediate artifact is written, so a later `mine` or
/// `summarize` can resume from it.
#[derive(Debug, Clone, Copy)]
pub struct FullStrategy;

impl super::CommandStrategy for FullStrategy {
    type Input = FullInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let ctx = input.ctx;
        let params = input.params.apply(ctx.config.mining);
        info!(
            "Mining with min_support={}, min_pair={}, top_k={}",
            params.min_support, params.min_pair, params.top_k
        );

        let documents = CrawlStrategy::fetch(&ctx, &input.sources).await?;

        let extractor = build_extractor(&ctx.config, input.model.clone())?;
        let (bundles, summary) =
            mine_documents(&ctx, extractor.as_ref(), &documents, &params).await?;

        let describer = build_describer(&ctx.config, input.model)?;
        let descriptions = describe_all(describer.as_ref(), &bundles).await;
        ctx.out.save_descriptions(&descriptions)?;

        println!(
            "Wrote {} posts, {} items, {} bundles → {}",
            documents.len(),
            summary.items,
            descriptions.len(),
            ctx.out.root().display()
        );
        Ok(())
    }
}
