pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::Item;

/// Source of listing items for a feed url.
#[async_trait]
pub trait Fetcher {
    /// Current items at `url`, in listing order.
    async fn fetch(&self, url: &str) -> Result<Vec<Item>>;
}
