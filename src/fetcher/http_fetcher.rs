use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::domain::Item;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct HttpFetcher {
    client: Client,
    normalizer: Normalizer,
}

impl HttpFetcher {
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            normalizer: Normalizer::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<Item>> {
        let response = self.client.get(url).send().await?;

        response.error_for_status_ref()?;

        let body = response.bytes().await?;
        let items = self.normalizer.normalize(&body)?;

        tracing::debug!("Fetched {} items from {}", items.len(), url);
        Ok(items)
    }
}
