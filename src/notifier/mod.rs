//! Outbound messages.
//!
//! Every message goes through a single [`Notifier`]; callers await each
//! send, so deliveries never overlap.

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{FeedConfig, Item};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a plain-text message.
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// Writes messages to the log instead of delivering them (`--dry-run`).
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_message(&self, text: &str) -> Result<()> {
        tracing::info!("[dry-run] would send:\n{}", text);
        Ok(())
    }
}

pub fn format_post_message(feed: &FeedConfig, item: &Item) -> String {
    format!(
        "📢 [{}] New post:\n\n{}\n\n🔗 {}",
        feed.name,
        item.display_title(),
        item.post_url(&feed.url)
    )
}

pub fn format_error_message(error: &dyn std::fmt::Display) -> String {
    format!("⚠️ Error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_message_format() {
        let feed = FeedConfig::new("Test", "U");
        let item = Item::new("2").with_title("alpha only").with_permalink("/p2");

        assert_eq!(
            format_post_message(&feed, &item),
            "📢 [Test] New post:\n\nalpha only\n\n🔗 https://www.reddit.com/p2"
        );
    }

    #[test]
    fn test_post_message_without_permalink_links_feed() {
        let feed = FeedConfig::new("Test", "https://www.reddit.com/r/test/new.json");
        let item = Item::new("2").with_title("alpha only");

        assert!(format_post_message(&feed, &item)
            .ends_with("🔗 https://www.reddit.com/r/test/new.json"));
    }

    #[test]
    fn test_error_message_format() {
        assert_eq!(format_error_message(&"timed out"), "⚠️ Error: timed out");
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        assert!(LogNotifier.send_message("hello").await.is_ok());
    }
}
