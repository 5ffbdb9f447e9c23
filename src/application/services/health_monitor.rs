//! Out-of-band verification of link destinations.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Link, NewAccessStat};
use crate::domain::fetcher::Fetcher;
use crate::domain::repositories::{LinkRepository, StatsRepository};

/// Status recorded when a probe gets no response at all.
pub const DEFAULT_UNREACHABLE_STATUS: u16 = 503;

/// Result of one verification pass.
///
/// The background worker discards it; the admin CLI prints it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Status cached on the link when the pass started.
    pub previous_status: u16,
    /// Status observed by this pass, or the unreachable sentinel.
    pub observed_status: u16,
    /// Probe failure, if the observed status is the sentinel for that reason.
    pub fetch_error: Option<String>,
    /// True if the cached status was written.
    pub status_updated: bool,
    /// True if the access stat was stored.
    pub stat_recorded: bool,
}

impl VerificationOutcome {
    /// Returns true if the observed status differs from the cached one.
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.observed_status
    }
}

/// Runs verification passes against link destinations.
///
/// A pass never fails as a whole: probe errors become the unreachable sentinel,
/// and store errors are logged and reflected in the returned outcome only.
/// Nothing is retried; the next resolution schedules another pass.
pub struct HealthMonitor {
    links: Arc<dyn LinkRepository>,
    stats: Arc<dyn StatsRepository>,
    fetcher: Arc<dyn Fetcher>,
    unreachable_status: u16,
}

impl HealthMonitor {
    /// Creates a monitor using [`DEFAULT_UNREACHABLE_STATUS`] for failed probes.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        stats: Arc<dyn StatsRepository>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            links,
            stats,
            fetcher,
            unreachable_status: DEFAULT_UNREACHABLE_STATUS,
        }
    }

    /// Overrides the status recorded for failed probes.
    pub fn with_unreachable_status(mut self, status: u16) -> Self {
        self.unreachable_status = status;
        self
    }

    /// Verifies `link` and records the outcome.
    ///
    /// 1. Probe the destination; a failure counts as the unreachable sentinel.
    /// 2. Overwrite the cached status if it differs from the observed one.
    /// 3. Append exactly one access stat, changed or not.
    pub async fn verify(&self, link: &Link, referrer: &str, user_agent: &str) -> VerificationOutcome {
        let (observed_status, fetch_error) = match self.fetcher.fetch(&link.long_url).await {
            Ok(status) => {
                debug!(token = %link.token, status, "Destination responded");
                (status, None)
            }
            Err(e) => {
                warn!(
                    token = %link.token,
                    url = %link.long_url,
                    error = %e,
                    "Destination check failed"
                );
                (self.unreachable_status, Some(e.to_string()))
            }
        };

        let mut status_updated = false;
        if observed_status != link.last_status_code {
            info!(
                token = %link.token,
                from = link.last_status_code,
                to = observed_status,
                "Updating cached status"
            );
            match self.links.update_status(&link.token, observed_status).await {
                Ok(()) => status_updated = true,
                Err(e) => error!(token = %link.token, error = %e, "Failed to update cached status"),
            }
        }

        let stat = NewAccessStat::now(link.id, referrer, user_agent, observed_status);
        let stat_recorded = match self.stats.append(stat).await {
            Ok(_) => true,
            Err(e) => {
                error!(token = %link.token, error = %e, "Failed to record access stat");
                false
            }
        };

        let outcome = if fetch_error.is_some() { "unreachable" } else { "responded" };
        metrics::counter!("linkr_health_checks_total", "outcome" => outcome).increment(1);

        VerificationOutcome {
            previous_status: link.last_status_code,
            observed_status,
            fetch_error,
            status_updated,
            stat_recorded,
        }
    }
}
