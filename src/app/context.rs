use std::path::Path;
use std::sync::Arc;

use reqwest::Client;

use crate::app::error::{PostwatchError, Result};
use crate::config::{load_feeds, Settings};
use crate::domain::FeedConfig;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::notifier::{LogNotifier, Notifier, TelegramNotifier};
use crate::poller::{FeedPoller, PollerOptions};

/// Everything a poll run needs, loaded once at startup.
pub struct AppContext {
    pub settings: Settings,
    pub feeds: Vec<FeedConfig>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Load settings and feeds. With `dry_run` messages are only logged
    /// and Telegram credentials are not required.
    pub fn load(settings_path: Option<&Path>, feeds_path: &Path, dry_run: bool) -> Result<Self> {
        let settings = Settings::load(settings_path)?;
        let feeds = load_feeds(feeds_path)?;
        Self::from_parts(settings, feeds, dry_run)
    }

    pub fn from_parts(settings: Settings, feeds: Vec<FeedConfig>, dry_run: bool) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::with_client(client.clone()));
        let notifier = Self::build_notifier(&settings, client, dry_run)?;

        Ok(Self {
            settings,
            feeds,
            fetcher,
            notifier,
        })
    }

    fn build_notifier(settings: &Settings, client: Client, dry_run: bool) -> Result<Arc<dyn Notifier>> {
        if dry_run {
            return Ok(Arc::new(LogNotifier));
        }

        let telegram = &settings.telegram;
        if !telegram.is_complete() {
            return Err(PostwatchError::Config(
                "Telegram bot_token and chat_id are required (set them in the config file or via BOT_TOKEN / CHAT_ID), or use --dry-run".into(),
            ));
        }

        Ok(Arc::new(TelegramNotifier::new(
            client,
            telegram.bot_token.trim(),
            telegram.chat_id.trim(),
        )))
    }

    pub fn poller(&self) -> FeedPoller {
        FeedPoller::new(
            self.feeds.clone(),
            PollerOptions::from(&self.settings),
            self.fetcher.clone(),
            self.notifier.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TelegramSettings;

    #[test]
    fn test_dry_run_needs_no_credentials() {
        let ctx = AppContext::from_parts(Settings::default(), Vec::new(), true);
        assert!(ctx.is_ok());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = AppContext::from_parts(Settings::default(), Vec::new(), false);
        assert!(matches!(result, Err(PostwatchError::Config(_))));
    }

    #[test]
    fn test_poller_gets_every_feed() {
        let settings = Settings {
            telegram: TelegramSettings {
                bot_token: "t".into(),
                chat_id: "1".into(),
            },
            ..Settings::default()
        };
        let feeds = vec![
            FeedConfig::new("A", "https://example.com/a.json"),
            FeedConfig::new("B", "https://example.com/b.json"),
        ];

        let ctx = AppContext::from_parts(settings, feeds, false).unwrap();
        assert_eq!(ctx.poller().feeds().len(), 2);
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("config.toml");
        let feeds_path = dir.path().join("feeds.json");
        std::fs::write(&settings_path, "poll_interval_secs = 60\n").unwrap();
        std::fs::write(
            &feeds_path,
            r#"[{"name": "Rust", "url": "https://www.reddit.com/r/rust/new.json", "keywords": ["tokio"]}]"#,
        )
        .unwrap();

        let ctx = AppContext::load(Some(&settings_path), &feeds_path, true).unwrap();
        assert_eq!(ctx.settings.poll_interval_secs, 60);
        assert_eq!(ctx.feeds.len(), 1);
    }
}
