mod stats;

use clap::{Parser, Subcommand};
use reach_core::Platform;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "reach-cli")]
#[command(about = "Best-effort follower counts for public social profiles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract stats for one or more platform handles and print the report
    Stats {
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        youtube: Option<String>,
        #[arg(long)]
        tiktok: Option<String>,
        #[arg(long = "naver-blog")]
        naver_blog: Option<String>,
        /// Skip the per-request delay and use a single fixed user agent
        #[arg(long)]
        no_delay: bool,
        /// Print the report on one line instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Print the canonical identifier for a handle or profile URL
    Canonicalize {
        platform: Platform,
        raw: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = reach_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stats {
            instagram,
            youtube,
            tiktok,
            naver_blog,
            no_delay,
            compact,
        } => {
            let handles = reach_core::SocialHandles {
                instagram,
                youtube,
                tiktok,
                naver_blog,
            };
            stats::run_stats(&config, &handles, no_delay, compact).await?;
        }
        Commands::Canonicalize { platform, raw } => {
            let canonical = reach_scraper::canonicalize(platform, &raw);
            if canonical.is_empty() {
                anyhow::bail!("'{raw}' does not contain a usable {platform} identifier");
            }
            println!("{canonical}");
        }
    }

    Ok(())
}
