use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::{PostwatchError, Result};
use crate::domain::Item;
use crate::fetcher::Fetcher;

pub const DEFAULT_WORKERS: usize = 1;

/// Fetches several feeds at once, handing results back in input order.
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub async fn fetch_all(&self, urls: Vec<String>) -> Vec<Result<Vec<Item>>> {
        let mut handles = Vec::with_capacity(urls.len());

        for url in urls {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| PostwatchError::Other(format!("Fetch pool closed: {}", e)))?;
                fetcher.fetch(&url).await
            });

            handles.push(handle);
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                    results.push(Err(PostwatchError::Other(format!("Fetch task failed: {}", e))));
                }
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    struct SlowFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for SlowFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<Item>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if url == "bad" {
                return Err(PostwatchError::Other("boom".into()));
            }
            Ok(vec![Item::new(url)])
        }
    }

    fn slow() -> Arc<SlowFetcher> {
        Arc::new(SlowFetcher {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let fetcher = slow();
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), 4);
        let urls = vec!["a".to_string(), "bad".to_string(), "c".to_string()];

        let results = parallel.fetch_all(urls).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap()[0].id.as_deref(), Some("a"));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap()[0].id.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_worker_limit_is_respected() {
        let fetcher = slow();
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), 2);
        let urls = (0..6).map(|i| i.to_string()).collect();

        parallel.fetch_all(urls).await;

        assert!(fetcher.peak.load(Ordering::SeqCst) <= 2);
    }
}
