//! # Postwatch
//!
//! Polls listing feeds (Reddit-style `.json` endpoints), matches new posts
//! against per-feed include/exclude keywords, and sends one message per
//! qualifying post through Telegram.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → Poller (scope → matcher → seen-set) → Notifier
//! ```
//!
//! - [`fetcher`]: HTTP client returning listing items
//! - [`normalizer`]: Converts listing JSON into [`Item`](domain::Item)s
//! - [`matcher`]: Whole-word / substring keyword matching
//! - [`poller`]: Decision policy, seen-sets and poll cycles
//! - [`notifier`]: Message formatting and delivery
//!
//! ## Quick Start
//!
//! ```bash
//! # One cycle, printing messages instead of sending them
//! postwatch --feeds feeds.json once --dry-run
//!
//! # Run until stopped
//! BOT_TOKEN=... CHAT_ID=... postwatch run
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together settings,
/// feeds, fetcher and notifier.
pub mod app;

/// Command-line interface using clap.
///
/// - `run [--interval] [--dry-run]` - Poll until stopped
/// - `once [--dry-run]` - Single cycle
/// - `feeds` - List configured feeds
/// - `check <text>` - Evaluate a text against keyword rules
pub mod cli;

/// Settings (TOML) and feeds (JSON) loading.
pub mod config;

/// Poll loop with interval sleep and signal-driven shutdown.
pub mod daemon;

/// Core domain models.
///
/// - [`FeedConfig`](domain::FeedConfig): A watched feed and its keywords
/// - [`Item`](domain::Item): One listing entry
/// - [`MatchScope`](domain::MatchScope), [`MatchMode`](domain::MatchMode): Matching policy
pub mod domain;

/// Listing retrieval.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent prefetch with semaphore
pub mod fetcher;

pub mod matcher;

/// Listing JSON parsing.
pub mod normalizer;

pub mod notifier;

pub mod poller;
