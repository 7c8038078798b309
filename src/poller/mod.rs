//! Poll cycle and the match/dedup decision for each item.
//!
//! For every unseen item the include and exclude keyword sets are checked:
//!
//! | include hit | exclude hit | outcome                         |
//! |-------------|-------------|---------------------------------|
//! | yes         | no          | notify, remember id             |
//! | yes         | yes         | remember id, no notification    |
//! | no          | -           | nothing; re-checked next cycle  |

mod seen;

pub use seen::SeenSet;

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::app::PostwatchError;
use crate::config::Settings;
use crate::domain::{build_search_text, FeedConfig, Item, MatchPolicy};
use crate::fetcher::parallel::{ParallelFetcher, DEFAULT_WORKERS};
use crate::fetcher::Fetcher;
use crate::matcher::KeywordSet;
use crate::notifier::{format_error_message, format_post_message, Notifier};

/// What a failed fetch does to the rest of the cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop polling the remaining feeds and send one error message.
    #[default]
    AbortCycle,
    /// Report the failed feed and carry on with the next one.
    PerFeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Item carries no id or no title.
    Skipped,
    AlreadySeen,
    Notify,
    /// Include keyword hit, vetoed by an exclude keyword.
    Excluded,
    NoMatch,
}

/// Keyword hits for one item, with the first matching keyword of each list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub include_hit: Option<String>,
    pub exclude_hit: Option<String>,
}

impl Evaluation {
    pub fn should_notify(&self) -> bool {
        self.include_hit.is_some() && self.exclude_hit.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerOptions {
    pub policy: MatchPolicy,
    pub failure_policy: FailurePolicy,
    pub fetch_workers: usize,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            failure_policy: FailurePolicy::default(),
            fetch_workers: DEFAULT_WORKERS,
        }
    }
}

impl From<&Settings> for PollerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            policy: settings.match_policy(),
            failure_policy: settings.failure_policy,
            fetch_workers: settings.fetch_workers,
        }
    }
}

/// A configured feed with its compiled keywords and seen-set.
pub struct WatchedFeed {
    config: FeedConfig,
    policy: MatchPolicy,
    include: KeywordSet,
    exclude: KeywordSet,
    seen: SeenSet,
}

impl WatchedFeed {
    pub fn new(config: FeedConfig, defaults: &MatchPolicy) -> Self {
        let policy = config.effective_policy(defaults);
        let include = KeywordSet::new(&config.include_keywords, policy.mode);
        let exclude = KeywordSet::new(&config.exclude_keywords, policy.mode);

        Self {
            config,
            policy,
            include,
            exclude,
            seen: SeenSet::new(),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn evaluate(&self, item: &Item) -> Evaluation {
        let include_text = build_search_text(item, self.policy.include_scope);
        let include_hit = self.include.find(&include_text).map(String::from);

        // Exclude rules only matter once an include keyword hit.
        let exclude_hit = if include_hit.is_some() {
            let exclude_text = build_search_text(item, self.policy.exclude_scope);
            self.exclude.find(&exclude_text).map(String::from)
        } else {
            None
        };

        Evaluation {
            include_hit,
            exclude_hit,
        }
    }

    /// Classify `item` without touching the seen-set.
    pub fn decide(&self, item: &Item) -> Decision {
        let Some(id) = item.id.as_deref() else {
            return Decision::Skipped;
        };

        if item.title.is_none() {
            return Decision::Skipped;
        }

        if self.seen.contains(id) {
            return Decision::AlreadySeen;
        }

        let evaluation = self.evaluate(item);
        match (evaluation.include_hit, evaluation.exclude_hit) {
            (Some(_), None) => Decision::Notify,
            (Some(_), Some(_)) => Decision::Excluded,
            (None, _) => Decision::NoMatch,
        }
    }
}

/// Per-feed counts from one pass over a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedReport {
    pub notified: usize,
    pub excluded: usize,
    pub unmatched: usize,
    pub already_seen: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub feeds_polled: usize,
    pub feeds_failed: usize,
    pub notified: usize,
    pub excluded: usize,
    /// A fetch failure ended the cycle before every feed was polled.
    pub aborted: bool,
}

impl CycleReport {
    fn absorb(&mut self, feed: &FeedReport) {
        self.feeds_polled += 1;
        self.notified += feed.notified;
        self.excluded += feed.excluded;
    }
}

pub struct FeedPoller {
    feeds: Vec<WatchedFeed>,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parallel: Option<ParallelFetcher>,
    notifier: Arc<dyn Notifier>,
    failure_policy: FailurePolicy,
}

impl FeedPoller {
    pub fn new(
        feeds: Vec<FeedConfig>,
        options: PollerOptions,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let feeds = feeds
            .into_iter()
            .map(|config| WatchedFeed::new(config, &options.policy))
            .collect();

        let parallel = (options.fetch_workers > 1)
            .then(|| ParallelFetcher::with_workers(fetcher.clone(), options.fetch_workers));

        Self {
            feeds,
            fetcher,
            parallel,
            notifier,
            failure_policy: options.failure_policy,
        }
    }

    pub fn feeds(&self) -> &[WatchedFeed] {
        &self.feeds
    }

    pub fn feed_by_name(&self, name: &str) -> Option<&WatchedFeed> {
        self.feeds.iter().find(|f| f.config.name == name)
    }

    pub fn seen(&self, url: &str) -> Option<&SeenSet> {
        self.feeds
            .iter()
            .find(|f| f.config.url == url)
            .map(|f| &f.seen)
    }

    /// Fetch every feed once and apply the decision policy to its items.
    pub async fn poll_cycle(&mut self) -> CycleReport {
        let start = Utc::now();
        let mut report = CycleReport::default();

        let mut prefetched = match &self.parallel {
            Some(parallel) => {
                let urls = self.feeds.iter().map(|f| f.config.url.clone()).collect();
                Some(parallel.fetch_all(urls).await.into_iter())
            }
            None => None,
        };

        for feed in self.feeds.iter_mut() {
            let fetched = match prefetched.as_mut().and_then(|results| results.next()) {
                Some(result) => result,
                None => self.fetcher.fetch(&feed.config.url).await,
            };

            match fetched {
                Ok(items) => {
                    let feed_report = process_items(feed, items, self.notifier.as_ref()).await;
                    if feed_report.notified > 0 || feed_report.excluded > 0 {
                        tracing::info!(
                            "  {}: {} notified, {} excluded",
                            feed.config.name,
                            feed_report.notified,
                            feed_report.excluded
                        );
                    }
                    report.absorb(&feed_report);
                }
                Err(e) => {
                    report.feeds_failed += 1;
                    tracing::warn!("Error fetching {}: {}", feed.config.name, e);
                    report_failure(self.notifier.as_ref(), &feed.config, &e).await;

                    if self.failure_policy == FailurePolicy::AbortCycle {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        let elapsed = Utc::now().signed_duration_since(start);
        tracing::info!(
            "Cycle complete: {} feeds polled, {} failed, {} notified, {} excluded ({:.1}s){}",
            report.feeds_polled,
            report.feeds_failed,
            report.notified,
            report.excluded,
            elapsed.num_milliseconds() as f64 / 1000.0,
            if report.aborted { ", aborted" } else { "" }
        );

        report
    }
}

/// Run the decision policy over `items` in listing order.
pub async fn process_items(
    feed: &mut WatchedFeed,
    items: Vec<Item>,
    notifier: &dyn Notifier,
) -> FeedReport {
    let mut report = FeedReport::default();

    for item in items {
        let decision = feed.decide(&item);
        tracing::debug!(
            "[{}] item {:?}: {:?}",
            feed.config.name,
            item.id.as_deref().unwrap_or("-"),
            decision
        );

        match decision {
            Decision::Notify => {
                let message = format_post_message(&feed.config, &item);
                if let Err(e) = notifier.send_message(&message).await {
                    tracing::error!("Failed to send notification for {}: {}", feed.config.name, e);
                }
                if let Some(id) = item.id {
                    feed.seen.insert(id);
                }
                report.notified += 1;
            }
            Decision::Excluded => {
                if let Some(id) = item.id {
                    feed.seen.insert(id);
                }
                report.excluded += 1;
            }
            Decision::NoMatch => report.unmatched += 1,
            Decision::AlreadySeen => report.already_seen += 1,
            Decision::Skipped => report.skipped += 1,
        }
    }

    report
}

async fn report_failure(notifier: &dyn Notifier, feed: &FeedConfig, error: &PostwatchError) {
    let message = format_error_message(&format!("[{}] {}", feed.name, error));
    if let Err(e) = notifier.send_message(&message).await {
        tracing::error!("Failed to send error notification: {}", e);
    }
}
