use stackmine_core::Document;
use stackmine_sources::crawl;
use stackmine_store::RAW_POSTS;
use tracing::info;

use super::{RunContext, SourceArgs, build_sources};

/// Input parameters for the Crawl command strategy.
#[derive(Debug, Clone)]
pub struct CrawlInput {
    pub ctx: RunContext,
    pub sources: SourceArgs,
}

/// Strategy for fetching raw posts into `raw_posts.json`.
#[derive(Debug, Clone, Copy)]
pub struct CrawlStrategy;

impl CrawlStrategy {
    pub(super) async fn fetch(
        ctx: &RunContext,
        args: &SourceArgs,
    ) -> anyhow::Result<Vec<Document>> {
        let sources = build_sources(&ctx.config, args)?;
        info!("Crawling {} sources", sources.len());
        let documents = crawl(&sources).await?;
        ctx.out.save(RAW_POSTS, &documents)?;
        Ok(documents)
    }
}

impl super::CommandStrategy for CrawlStrategy {
    type Input = CrawlInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let documents = Self::fetch(&input.ctx, &input.sources).await?;
        println!(
            "Wrote {} posts → {}",
            documents.len(),
            input.ctx.out.path(RAW_POSTS).display()
        );
        Ok(())
    }
}
