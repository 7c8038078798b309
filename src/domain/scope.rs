use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Item;

/// Which fields of an item are searched for a keyword category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MatchScope {
    #[default]
    TitleBody,
    BodyOnly,
    TitleOnly,
}

impl MatchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchScope::TitleBody => "title_body",
            MatchScope::BodyOnly => "body_only",
            MatchScope::TitleOnly => "title_only",
        }
    }
}

// Unknown names fall back to title_body instead of failing the load.
impl From<&str> for MatchScope {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "title_only" => MatchScope::TitleOnly,
            "body_only" => MatchScope::BodyOnly,
            _ => MatchScope::TitleBody,
        }
    }
}

impl From<String> for MatchScope {
    fn from(s: String) -> Self {
        MatchScope::from(s.as_str())
    }
}

impl fmt::Display for MatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Keyword must not touch an ASCII letter, digit or underscore.
    #[default]
    WholeWord,
    Substring,
}

impl MatchMode {
    pub fn from_whole_word(whole_word: bool) -> Self {
        if whole_word {
            MatchMode::WholeWord
        } else {
            MatchMode::Substring
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::WholeWord => f.write_str("whole_word"),
            MatchMode::Substring => f.write_str("substring"),
        }
    }
}

/// Scopes and mode applied to one feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchPolicy {
    pub include_scope: MatchScope,
    pub exclude_scope: MatchScope,
    pub mode: MatchMode,
}

/// Text searched for `scope`. Absent fields count as empty strings.
pub fn build_search_text(item: &Item, scope: MatchScope) -> String {
    let title = item.title.as_deref().unwrap_or("");
    let body = item.body.as_deref().unwrap_or("");

    match scope {
        MatchScope::TitleOnly => title.to_string(),
        MatchScope::BodyOnly => body.to_string(),
        MatchScope::TitleBody => format!("{}\n{}", title, body),
    }
}
