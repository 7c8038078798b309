use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{MatchMode, MatchPolicy, MatchScope};

/// One watched listing, as written in the feeds file.
///
/// `url` is the identity key: the poller keeps one seen-set per url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
    #[serde(rename = "keywords")]
    pub include_keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub exclude_keywords: Vec<String>,
    /// Per-feed overrides of the process-wide matching policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_scope: Option<MatchScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_scope: Option<MatchScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whole_word: Option<bool>,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            include_keywords: Vec::new(),
            exclude_keywords: Vec::new(),
            include_scope: None,
            exclude_scope: None,
            whole_word: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_keywords = include.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude_keywords<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_keywords = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the policy for this feed, falling back to the process-wide one.
    pub fn effective_policy(&self, defaults: &MatchPolicy) -> MatchPolicy {
        MatchPolicy {
            include_scope: self.include_scope.unwrap_or(defaults.include_scope),
            exclude_scope: self.exclude_scope.unwrap_or(defaults.exclude_scope),
            mode: self
                .whole_word
                .map(MatchMode::from_whole_word)
                .unwrap_or(defaults.mode),
        }
    }
}

// An explicit `null` behaves exactly like an absent list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclude_keywords_default_to_empty() {
        let json = r#"{"name": "Rust", "url": "https://www.reddit.com/r/rust/new.json", "keywords": ["tokio"]}"#;
        let feed: FeedConfig = serde_json::from_str(json).unwrap();
        assert_eq!(feed.include_keywords, vec!["tokio"]);
        assert!(feed.exclude_keywords.is_empty());
    }

    #[test]
    fn test_null_exclude_keywords_same_as_absent() {
        let json = r#"{"name": "Rust", "url": "u", "keywords": [], "exclude_keywords": null}"#;
        let feed: FeedConfig = serde_json::from_str(json).unwrap();
        assert!(feed.exclude_keywords.is_empty());
    }

    #[test]
    fn test_keywords_are_required() {
        let json = r#"{"name": "Rust", "url": "u"}"#;
        assert!(serde_json::from_str::<FeedConfig>(json).is_err());
    }

    #[test]
    fn test_effective_policy_uses_defaults() {
        let feed = FeedConfig::new("Rust", "u");
        let defaults = MatchPolicy::default();
        assert_eq!(feed.effective_policy(&defaults), defaults);
    }

    #[test]
    fn test_effective_policy_applies_overrides() {
        let json = r#"{"name": "Jobs", "url": "u", "keywords": ["rust"],
            "include_scope": "title_only", "whole_word": false}"#;
        let feed: FeedConfig = serde_json::from_str(json).unwrap();
        let policy = feed.effective_policy(&MatchPolicy::default());
        assert_eq!(policy.include_scope, MatchScope::TitleOnly);
        assert_eq!(policy.exclude_scope, MatchScope::TitleBody);
        assert_eq!(policy.mode, MatchMode::Substring);
    }
}
