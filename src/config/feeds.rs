use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::config::ConfigError;
use crate::domain::FeedConfig;

pub const DEFAULT_FEEDS_PATH: &str = "feeds.json";

/// Read and validate the feeds file.
pub fn load_feeds(path: &Path) -> Result<Vec<FeedConfig>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let feeds = parse_feeds(&content, path)?;
    tracing::debug!("Loaded {} feeds from {}", feeds.len(), path.display());
    Ok(feeds)
}

pub fn parse_feeds(content: &str, path: &Path) -> Result<Vec<FeedConfig>, ConfigError> {
    let feeds: Vec<FeedConfig> = serde_json::from_str(content).map_err(|e| ConfigError::Feeds {
        path: PathBuf::from(path),
        source: e,
    })?;

    validate_feeds(&feeds)?;
    Ok(feeds)
}

fn validate_feeds(feeds: &[FeedConfig]) -> Result<(), ConfigError> {
    let mut urls = HashSet::new();

    for feed in feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "Feed with url {} has an empty name",
                feed.url
            )));
        }

        Url::parse(&feed.url).map_err(|e| {
            ConfigError::Invalid(format!("Feed {} has an invalid url '{}': {}", feed.name, feed.url, e))
        })?;

        if !urls.insert(feed.url.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Feed url {} is configured more than once",
                feed.url
            )));
        }

        if feed.include_keywords.iter().all(|k| k.trim().is_empty()) {
            tracing::warn!("Feed {} has no include keywords and will never notify", feed.name);
        }
    }

    Ok(())
}
