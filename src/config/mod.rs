//! Configuration management for Postwatch.
//!
//! Two files are involved:
//! - the settings file (`~/.config/postwatch/config.toml` unless given on
//!   the command line) holding process-wide tunables and credentials;
//! - the feeds file, a JSON array of [`FeedConfig`](crate::domain::FeedConfig).
//!
//! Both are read once at startup.

pub mod feeds;

pub use feeds::load_feeds;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::PostwatchError;
use crate::domain::{MatchMode, MatchPolicy, MatchScope};
use crate::fetcher::http_fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::fetcher::parallel::DEFAULT_WORKERS;
use crate::poller::FailurePolicy;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;

pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "CHAT_ID";

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub poll_interval_secs: u64,
    pub include_scope: MatchScope,
    pub exclude_scope: MatchScope,
    pub whole_word: bool,
    pub failure_policy: FailurePolicy,
    pub fetch_workers: usize,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub telegram: TelegramSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            include_scope: MatchScope::TitleBody,
            exclude_scope: MatchScope::TitleBody,
            whole_word: true,
            failure_policy: FailurePolicy::AbortCycle,
            fetch_workers: DEFAULT_WORKERS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            telegram: TelegramSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramSettings {
    /// Fill blank fields from `BOT_TOKEN` / `CHAT_ID`.
    pub fn with_env_fallback(mut self) -> Self {
        if self.bot_token.trim().is_empty() {
            self.bot_token = std::env::var(BOT_TOKEN_ENV).unwrap_or_default();
        }
        if self.chat_id.trim().is_empty() {
            self.chat_id = std::env::var(CHAT_ID_ENV).unwrap_or_default();
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. At the default location a commented
    /// default file is created on first use. Missing fields take defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::create_default_config(&config_path)?;
                    Self::default()
                } else {
                    Self::load_from(&config_path)?
                }
            }
        };

        settings.telegram = settings.telegram.with_env_fallback();
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/postwatch/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("postwatch").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be greater than zero".into(),
            ));
        }
        if self.fetch_workers == 0 {
            return Err(ConfigError::Invalid(
                "fetch_workers must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Matching policy applied to feeds without their own overrides.
    pub fn match_policy(&self) -> MatchPolicy {
        MatchPolicy {
            include_scope: self.include_scope,
            exclude_scope: self.exclude_scope,
            mode: MatchMode::from_whole_word(self.whole_word),
        }
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!("Wrote default settings to {}", path.display());
        Ok(())
    }

    fn default_config_content() -> String {
        r##"# Postwatch configuration
#
# Scopes: "title_body", "title_only", "body_only"
# failure_policy:
#   "abort_cycle" - first failed feed ends the cycle, one error message is sent
#   "per_feed"    - failed feeds are reported and the next feed is polled

# Seconds between poll cycles
poll_interval_secs = 600

include_scope = "title_body"
exclude_scope = "title_body"

# Keywords must not touch an ASCII letter, digit or underscore
whole_word = true

failure_policy = "abort_cycle"

# Feeds fetched concurrently (1 = one after another)
fetch_workers = 1

user_agent = "Mozilla/5.0"
request_timeout_secs = 10

[telegram]
# Left empty, BOT_TOKEN and CHAT_ID are read from the environment
bot_token = ""
chat_id = ""
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse feeds file at {path}: {source}")]
    Feeds {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

impl From<ConfigError> for PostwatchError {
    fn from(e: ConfigError) -> Self {
        PostwatchError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Settings::default_config_content();
        let settings: Settings =
            toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
poll_interval_secs = 120
include_scope = "title_only"
"#;
        let settings: Settings = toml::from_str(content).expect("Partial config should work");

        assert_eq!(settings.poll_interval_secs, 120);
        assert_eq!(settings.include_scope, MatchScope::TitleOnly);
        assert_eq!(settings.exclude_scope, MatchScope::TitleBody);
        assert!(settings.whole_word);
        assert_eq!(settings.failure_policy, FailurePolicy::AbortCycle);
    }

    #[test]
    fn test_empty_config() {
        let settings: Settings = toml::from_str("").expect("Empty config should work");
        assert_eq!(settings.poll_interval(), Duration::from_secs(600));
        assert_eq!(settings.match_policy(), MatchPolicy::default());
    }

    #[test]
    fn test_per_feed_policy_and_substring_mode() {
        let content = r#"
whole_word = false
failure_policy = "per_feed"
"#;
        let settings: Settings = toml::from_str(content).unwrap();
        assert_eq!(settings.failure_policy, FailurePolicy::PerFeed);
        assert_eq!(settings.match_policy().mode, MatchMode::Substring);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "poll_interval_secs = 30\n[telegram]\nbot_token = \"t\"\nchat_id = \"1\"\n")
            .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.poll_interval_secs, 30);
        assert!(settings.telegram.is_complete());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "poll_interval_secs = \"soon\"").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let settings = Settings {
            poll_interval_secs: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_incomplete_telegram_settings() {
        let telegram = TelegramSettings {
            bot_token: "t".into(),
            chat_id: " ".into(),
        };
        assert!(!telegram.is_complete());
    }
}
