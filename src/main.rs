use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use postwatch::app::AppContext;
use postwatch::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Run { interval, dry_run } => {
            let ctx = AppContext::load(config, &cli.feeds, dry_run)?;
            commands::run_daemon(&ctx, interval.as_deref()).await?;
        }
        Commands::Once { dry_run } => {
            let ctx = AppContext::load(config, &cli.feeds, dry_run)?;
            commands::run_once(&ctx).await?;
        }
        Commands::Feeds => {
            let ctx = AppContext::load(config, &cli.feeds, true)?;
            commands::list_feeds(&ctx)?;
        }
        Commands::Check { text, body, feed } => {
            let ctx = AppContext::load(config, &cli.feeds, true)?;
            commands::check_text(&ctx, &text, body.as_deref(), feed.as_deref())?;
        }
    }

    Ok(())
}
