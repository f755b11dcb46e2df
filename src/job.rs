//! The background scrape job and its periodic scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::notify::{Notifier, NotifyError};
use crate::posting::Posting;
use crate::scrape::Scraper;

/// Where to mail the results of a run.
pub struct Delivery {
    pub notifier: Notifier,
    pub recipient: String,
}

/// One scrape cycle followed by an optional notification.
pub struct ScrapeJob {
    scraper: Scraper,
    delivery: Option<Delivery>,
}

impl ScrapeJob {
    #[must_use]
    pub fn new(scraper: Scraper, delivery: Option<Delivery>) -> Self {
        Self { scraper, delivery }
    }

    /// Scrape once and mail any surviving postings.
    ///
    /// Scrape failures are logged and treated as an empty run. Nothing is
    /// mailed for an empty run.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification mail cannot be sent.
    pub async fn run(&self) -> Result<Vec<Posting>, NotifyError> {
        let postings = self.scraper.run_cycle().await;

        match &self.delivery {
            Some(delivery) if !postings.is_empty() => {
                delivery
                    .notifier
                    .send(&postings, &delivery.recipient)
                    .await?;
            }
            Some(_) => debug!("No new postings, skipping notification"),
            None => {}
        }

        Ok(postings)
    }
}

/// Admits at most one scrape run at a time.
#[derive(Debug, Clone)]
pub struct RunGuard {
    permits: Arc<Semaphore>,
}

/// Held for the duration of a run; dropping it lets the next run start.
#[derive(Debug)]
pub struct RunPermit {
    _permit: OwnedSemaphorePermit,
}

impl RunGuard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Start a run, or `None` if one is already in progress.
    #[must_use]
    pub fn try_start(&self) -> Option<RunPermit> {
        Arc::clone(&self.permits)
            .try_acquire_owned()
            .ok()
            .map(|permit| RunPermit { _permit: permit })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for RunGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the job now and then on every `interval` tick, forever.
///
/// Each run is spawned so a slow upstream does not delay the schedule; a tick
/// that arrives while the previous run is still going is skipped.
pub async fn watch_loop(job: Arc<ScrapeJob>, interval: Duration, guard: RunGuard) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(interval_secs = interval.as_secs(), "Scrape scheduler started");

    loop {
        ticker.tick().await;

        let Some(permit) = guard.try_start() else {
            warn!("Previous scrape still running, skipping this tick");
            continue;
        };

        let job = Arc::clone(&job);
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = job.run().await {
                error!("Notification failed: {e}");
            }
        });
    }
}
