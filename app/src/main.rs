#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Args, Parser, Subcommand};
use command::{
    CommandStrategy, CrawlInput, CrawlStrategy, FullInput, FullStrategy, InfoStrategy,
    InitStrategy, MineInput, MineStrategy, ParamOverrides, RunContext, SourceArgs,
    SummarizeInput, SummarizeStrategy, VersionStrategy,
};
use stackmine_config::Config;
use stackmine_store::OutputDir;
use std::path::PathBuf;
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "stackmine")]
#[command(about = "Mine co-mentioned technology bundles from developer threads", long_about = None)]
struct Cli {
    /// Output directory (default: config `output.dir` or ~/stackmine/out)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct SourceFlags {
    /// Subreddits to crawl, e.g. r/devops
    #[arg(long, num_args = 0..)]
    reddit: Option<Vec<String>>,

    /// Stack Overflow tags to crawl
    #[arg(long = "so-tags", num_args = 0..)]
    so_tags: Option<Vec<String>>,

    /// Posts per source
    #[arg(long)]
    limit: Option<usize>,
}

impl From<SourceFlags> for SourceArgs {
    fn from(flags: SourceFlags) -> Self {
        Self {
            reddit: flags.reddit,
            so_tags: flags.so_tags,
            limit: flags.limit,
        }
    }
}

#[derive(Args, Debug, Clone, Copy, Default)]
struct MiningFlags {
    /// Minimum number of documents mentioning each bundle item
    #[arg(long = "min-support", value_parser = clap::value_parser!(u32).range(1..))]
    min_support: Option<u32>,

    /// Minimum number of documents mentioning each pair of bundle items
    #[arg(long = "min-pair", value_parser = clap::value_parser!(u32).range(1..))]
    min_pair: Option<u32>,

    /// Maximum number of bundles
    #[arg(long = "top-k")]
    top_k: Option<usize>,
}

impl From<MiningFlags> for ParamOverrides {
    fn from(flags: MiningFlags) -> Self {
        Self {
            min_support: flags.min_support,
            min_pair: flags.min_pair,
            top_k: flags.top_k,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl, extract, mine and summarize
    Full {
        #[command(flatten)]
        sources: SourceFlags,

        /// Model to use for extraction and summaries
        #[arg(short = 'M', long)]
        model: Option<String>,

        #[command(flatten)]
        mining: MiningFlags,
    },
    /// Only fetch raw posts
    Crawl {
        #[command(flatten)]
        sources: SourceFlags,
    },
    /// Extract items and mine bundles from raw_posts.json
    Mine {
        /// Path to raw_posts.json
        #[arg(long)]
        input: PathBuf,

        /// Model to use for extraction
        #[arg(short = 'M', long)]
        model: Option<String>,

        #[command(flatten)]
        mining: MiningFlags,
    },
    /// Add names and summaries to bundles_raw.json
    Summarize {
        /// Path to bundles_raw.json
        #[arg(long)]
        input: PathBuf,

        /// Model to use for summaries
        #[arg(short = 'M', long)]
        model: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);

    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = builder.with_env_filter(EnvFilter::from_default_env()).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let level = if verbose { Level::DEBUG } else { Level::INFO };
        let subscriber = builder.with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn run_context(out: Option<PathBuf>) -> anyhow::Result<RunContext> {
    let config = Config::load()?;
    let dir = match out {
        Some(dir) => dir,
        None => config.output_dir()?,
    };
    debug!("Output directory: {}", dir.display());
    Ok(RunContext {
        config,
        out: OutputDir::new(dir)?,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Full {
            sources,
            model,
            mining,
        } => {
            let input = FullInput {
                ctx: run_context(cli.out)?,
                sources: sources.into(),
                model,
                params: mining.into(),
            };
            FullStrategy.execute(input).await
        }
        Commands::Crawl { sources } => {
            let input = CrawlInput {
                ctx: run_context(cli.out)?,
                sources: sources.into(),
            };
            CrawlStrategy.execute(input).await
        }
        Commands::Mine {
            input,
            model,
            mining,
        } => {
            let input = MineInput {
                ctx: run_context(cli.out)?,
                input,
                model,
                params: mining.into(),
            };
            MineStrategy.execute(input).await
        }
        Commands::Summarize { input, model } => {
            let input = SummarizeInput {
                ctx: run_context(cli.out)?,
                input,
                model,
            };
            SummarizeStrategy.execute(input).await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(run_context(cli.out)?).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_with_overrides() {
        let cli = Cli::try_parse_from([
            "stackmine",
            "full",
            "--reddit",
            "r/rust",
            "r/golang",
            "--so-tags",
            "--min-pair",
            "2",
            "--top-k",
            "10",
        ]);
        let Ok(Cli {
            command: Commands::Full { sources, mining, .. },
            ..
        }) = cli
        else {
            panic!("expected full command");
        };
        assert_eq!(sources.reddit, Some(vec!["r/rust".into(), "r/golang".into()]));
        assert_eq!(sources.so_tags, Some(Vec::new()));
        assert_eq!(mining.min_pair, Some(2));
        assert_eq!(mining.top_k, Some(10));
        assert_eq!(mining.min_support, None);
    }

    #[test]
    fn rejects_zero_min_support() {
        let cli = Cli::try_parse_from([
            "stackmine",
            "mine",
            "--input",
            "x.json",
            "--min-support",
            "0",
        ]);
        assert!(cli.is_err());
    }

    #[test]
    fn global_out_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stackmine",
            "summarize",
            "--input",
            "b.json",
            "--out",
            "/tmp/o",
        ]);
        assert!(cli.is_ok_and(|c| c.out == Some(PathBuf::from("/tmp/o"))));
    }
}
