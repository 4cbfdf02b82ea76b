use stackmine_core::{BundleParams, Document};
use std::path::PathBuf;

use super::{ParamOverrides, RunContext, build_extractor, mine_documents};

/// Input parameters for the Mine command strategy.
#[derive(Debug, Clone)]
pub struct MineInput {
    pub ctx: RunContext,
    /// A `raw_posts.json` produced by `crawl`
    pub input: PathBuf,
    pub model: Option<String>,
    pub params: ParamOverrides,
}

/// Strategy for extracting items and mining raw bundles from saved posts.
#[derive(Debug, Clone, Copy)]
pub struct MineStrategy;

impl super::CommandStrategy for MineStrategy {
    type Input = MineInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let ctx = input.ctx;
        let params: BundleParams = input.params.apply(ctx.config.mining);
        let documents: Vec<Document> = stackmine_store::load_json(&input.input)?;

        let extractor = build_extractor(&ctx.config, input.model)?;
        let (bundles, _) = mine_documents(&ctx, extractor.as_ref(), &documents, &params).await?;

        println!("Bundles: {} (raw)", bundles.len());
        Ok(())
    }
}
