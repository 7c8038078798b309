use serde::{Deserialize, Serialize};

pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// A listing entry, alive only for the cycle that fetched it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub permalink: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = Some(permalink.into());
        self
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Link used in notifications; the feed url stands in when the
    /// listing carried no permalink.
    pub fn post_url(&self, feed_url: &str) -> String {
        match self.permalink.as_deref().filter(|p| !p.is_empty()) {
            Some(permalink) => format!("{}{}", REDDIT_BASE_URL, permalink),
            None => feed_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_url_from_permalink() {
        let item = Item::new("abc").with_permalink("/r/rust/comments/abc/hello/");
        assert_eq!(
            item.post_url("https://www.reddit.com/r/rust/new.json"),
            "https://www.reddit.com/r/rust/comments/abc/hello/"
        );
    }

    #[test]
    fn test_post_url_falls_back_to_feed_url() {
        let item = Item::new("abc");
        assert_eq!(item.post_url("https://example.com/feed.json"), "https://example.com/feed.json");
    }

    #[test]
    fn test_empty_permalink_falls_back_to_feed_url() {
        let item = Item::new("abc").with_permalink("");
        assert_eq!(item.post_url("U"), "U");
    }

    #[test]
    fn test_display_title_without_title() {
        assert_eq!(Item::new("abc").display_title(), "");
    }
}
