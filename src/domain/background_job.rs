//! Background jobs scheduled by the resolution path.

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::entities::Link;

/// Work that must never block the caller of a redirect.
///
/// Jobs are sent to a bounded channel and executed by
/// [`crate::application::background_worker::run_background_worker`].
#[derive(Debug, Clone)]
pub enum BackgroundJob {
    /// Add one to the click counter of `token`.
    IncrementClicks { token: String },

    /// Run one verification pass for `link`.
    ///
    /// Carries the link as it was loaded by the request, so the pass compares
    /// against the status cached at resolution time.
    Verify {
        link: Link,
        referrer: String,
        user_agent: String,
    },
}

impl BackgroundJob {
    /// Short job name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IncrementClicks { .. } => "increment_clicks",
            Self::Verify { .. } => "verify",
        }
    }

    /// Token of the link the job acts on.
    pub fn token(&self) -> &str {
        match self {
            Self::IncrementClicks { token } => token,
            Self::Verify { link, .. } => &link.token,
        }
    }
}

/// Sending half of the background job queue.
///
/// Scheduling never waits: when the queue is full or closed the job is dropped
/// and logged. Lost jobs degrade analytics, they do not affect redirects.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<BackgroundJob>,
}

impl JobQueue {
    /// Creates a bounded queue and returns it with its receiving half.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<BackgroundJob>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueues a job without waiting.
    ///
    /// Returns `false` if the job was dropped.
    pub fn schedule(&self, job: BackgroundJob) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(job)) => {
                warn!(kind = job.kind(), token = job.token(), "Job queue full, dropping job");
                metrics::counter!("linkr_background_jobs_dropped_total", "kind" => job.kind())
                    .increment(1);
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                warn!(kind = job.kind(), token = job.token(), "Job queue closed, dropping job");
                metrics::counter!("linkr_background_jobs_dropped_total", "kind" => job.kind())
                    .increment(1);
                false
            }
        }
    }

    /// Returns true if the worker side has shut down.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Current free slots in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}
