//! Long-running poll loop.
//!
//! Runs a cycle, sleeps for the configured interval, and repeats until the
//! process receives SIGINT/SIGTERM (Ctrl-C on Windows).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::poller::FeedPoller;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Pause between cycles in seconds (default: 600 = 10 minutes)
    pub poll_interval_secs: u64,
    /// Listen for termination signals
    pub handle_signals: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: crate::config::DEFAULT_POLL_INTERVAL_SECS,
            handle_signals: true,
        }
    }
}

impl DaemonConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> Result<u64, String> {
        let s = s.trim().to_lowercase();

        let secs = if let Some(hours) = s.strip_suffix('h') {
            hours
                .parse::<u64>()
                .map(|h| h * 3600)
                .map_err(|_| format!("Invalid hours: {}", hours))
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes
                .parse::<u64>()
                .map(|m| m * 60)
                .map_err(|_| format!("Invalid minutes: {}", minutes))
        } else if let Some(days) = s.strip_suffix('d') {
            days.parse::<u64>()
                .map(|d| d * 86400)
                .map_err(|_| format!("Invalid days: {}", days))
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map_err(|_| format!("Invalid seconds: {}", secs))
        } else {
            s.parse::<u64>()
                .map_err(|_| format!("Invalid interval: {}. Use format like '90s', '10m', '1h'", s))
        }?;

        if secs == 0 {
            return Err("Interval must be greater than zero".to_string());
        }
        Ok(secs)
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Stops a running [`Daemon`] from another task.
#[derive(Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl ShutdownHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.wake.notify_one();
    }
}

/// Daemon runner
pub struct Daemon {
    poller: FeedPoller,
    config: DaemonConfig,
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
    cycles: u64,
}

impl Daemon {
    pub fn new(poller: FeedPoller, config: DaemonConfig) -> Self {
        Self {
            poller,
            config,
            running: Arc::new(AtomicBool::new(true)),
            wake: Arc::new(Notify::new()),
            cycles: 0,
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: self.running.clone(),
            wake: self.wake.clone(),
        }
    }

    pub fn poller(&self) -> &FeedPoller {
        &self.poller
    }

    /// Completed cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run until stopped. Cycle failures never end the loop.
    pub async fn run(&mut self) {
        if self.config.handle_signals {
            spawn_signal_listener(self.shutdown_handle());
        }

        tracing::info!(
            "Postwatch started (poll interval: {}, feeds: {}, PID: {})",
            DaemonConfig::format_interval(self.config.poll_interval_secs),
            self.poller.feeds().len(),
            std::process::id()
        );

        let interval = Duration::from_secs(self.config.poll_interval_secs);

        while self.running.load(Ordering::SeqCst) {
            self.poller.poll_cycle().await;
            self.cycles += 1;

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = self.wake.notified() => {}
            }
        }

        tracing::info!("Postwatch shutting down after {} cycles", self.cycles);
    }
}

fn spawn_signal_listener(handle: ShutdownHandle) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("Failed to set up signal handlers: {}", e);
                    return;
                }
            };

        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
            handle.stop();
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            handle.stop();
        });
    }
}
