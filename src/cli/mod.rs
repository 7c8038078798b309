pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::feeds::DEFAULT_FEEDS_PATH;

#[derive(Parser)]
#[command(name = "postwatch")]
#[command(about = "Watch listing feeds for keywords and send a message per new match", long_about = None)]
pub struct Cli {
    /// Settings file (default: ~/.config/postwatch/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Feeds file (JSON array of feeds)
    #[arg(short, long, default_value = DEFAULT_FEEDS_PATH, global = true)]
    pub feeds: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll all feeds until stopped
    Run {
        /// Override the poll interval (e.g., "600", "90s", "10m", "1h")
        #[arg(short, long)]
        interval: Option<String>,

        /// Log messages instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a single poll cycle
    Once {
        /// Log messages instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// List configured feeds
    Feeds,
    /// Show how a text would be treated by a feed's keyword rules
    Check {
        /// Text to test (used as the title; see --body)
        text: String,

        /// Optional body text
        #[arg(long)]
        body: Option<String>,

        /// Only check this feed (by name)
        #[arg(long)]
        feed: Option<String>,
    },
}
