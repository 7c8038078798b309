use crate::app::{AppContext, PostwatchError, Result};
use crate::daemon::{Daemon, DaemonConfig};
use crate::domain::Item;
use crate::poller::{FeedPoller, WatchedFeed};

pub async fn run_daemon(ctx: &AppContext, interval: Option<&str>) -> Result<()> {
    let poll_interval_secs = match interval {
        Some(s) => DaemonConfig::parse_interval(s).map_err(PostwatchError::Config)?,
        None => ctx.settings.poll_interval_secs,
    };

    if ctx.feeds.is_empty() {
        println!("No feeds configured");
        return Ok(());
    }

    let config = DaemonConfig {
        poll_interval_secs,
        ..DaemonConfig::default()
    };

    let mut daemon = Daemon::new(ctx.poller(), config);
    daemon.run().await;
    Ok(())
}

pub async fn run_once(ctx: &AppContext) -> Result<()> {
    if ctx.feeds.is_empty() {
        println!("No feeds configured");
        return Ok(());
    }

    println!("Polling {} feeds...", ctx.feeds.len());

    let mut poller = ctx.poller();
    let report = poller.poll_cycle().await;

    println!(
        "Cycle complete: {} notified, {} excluded, {} feeds polled, {} failed{}",
        report.notified,
        report.excluded,
        report.feeds_polled,
        report.feeds_failed,
        if report.aborted { " (aborted)" } else { "" }
    );
    Ok(())
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    let poller = ctx.poller();

    if poller.feeds().is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in poller.feeds() {
        let config = feed.config();
        let policy = feed.policy();
        println!(
            "{}\n  {}\n  include: [{}] in {}\n  exclude: [{}] in {}\n  mode: {}",
            config.name,
            config.url,
            config.include_keywords.join(", "),
            policy.include_scope,
            config.exclude_keywords.join(", "),
            policy.exclude_scope,
            policy.mode
        );
    }

    Ok(())
}

pub fn check_text(ctx: &AppContext, text: &str, body: Option<&str>, feed: Option<&str>) -> Result<()> {
    let poller = ctx.poller();
    let feeds = select_feeds(&poller, feed)?;

    let mut item = Item::new("check").with_title(text);
    if let Some(body) = body {
        item = item.with_body(body);
    }

    for watched in feeds {
        let evaluation = watched.evaluate(&item);
        let verdict = match (&evaluation.include_hit, &evaluation.exclude_hit) {
            (Some(inc), None) => format!("notify (matched \"{}\")", inc),
            (Some(inc), Some(exc)) => {
                format!("excluded (matched \"{}\", vetoed by \"{}\")", inc, exc)
            }
            (None, _) => "no match".to_string(),
        };
        println!("{}: {}", watched.config().name, verdict);
    }

    Ok(())
}

fn select_feeds<'a>(poller: &'a FeedPoller, name: Option<&str>) -> Result<Vec<&'a WatchedFeed>> {
    match name {
        Some(name) => poller
            .feed_by_name(name)
            .map(|f| vec![f])
            .ok_or_else(|| PostwatchError::FeedNotFound(name.to_string())),
        None => Ok(poller.feeds().iter().collect()),
    }
}
