use stackmine_core::{Bundle, describe_all};
use stackmine_store::BUNDLES;
use std::path::PathBuf;

use super::{RunContext, build_describer};

/// Input parameters for the Summarize command strategy.
#[derive(Debug, Clone)]
pub struct SummarizeInput {
    pub ctx: RunContext,
    /// A `bundles_raw.json` produced by `mine`
    pub input: PathBuf,
    pub model: Option<String>,
}

/// Strategy for naming and summarizing mined bundles.
#[derive(Debug, Clone, Copy)]
pub struct SummarizeStrategy;

impl super::CommandStrategy for SummarizeStrategy {
    type Input = SummarizeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let bundles: Vec<Bundle> = stackmine_store::load_json(&input.input)?;

        let describer = build_describer(&input.ctx.config, input.model)?;
        let descriptions = describe_all(describer.as_ref(), &bundles).await;
        input.ctx.out.save_descriptions(&descriptions)?;

        println!(
            "Summarized {} bundles → {}",
            descriptions.len(),
            input.ctx.out.path(BUNDLES).display()
        );
        Ok(())
    }
}
