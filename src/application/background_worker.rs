//! Executes jobs handed off by the resolution path.

use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::application::services::HealthMonitor;
use crate::domain::background_job::BackgroundJob;
use crate::domain::repositories::LinkRepository;

/// Verification passes allowed to wait for a slot, per slot.
const VERIFY_BACKLOG_PER_SLOT: usize = 64;

/// Drains the job queue, running each job as its own task.
///
/// Click increments start as soon as they are received. Verification passes
/// go through a second dispatcher that runs at most `concurrency` of them at
/// once, so slow destinations never hold back click counting. When that
/// backlog is full, the pass is dropped and logged like a full job queue.
///
/// Jobs are independent: a click increment and a verification pass for the
/// same token may finish in either order, and overlapping passes for one token
/// overwrite the cached status last-write-wins.
///
/// Returns once every [`crate::domain::background_job::JobQueue`] handle has been
/// dropped, the queue is empty and every started job has finished. Shutdown can
/// therefore take up to one fetch timeout.
pub async fn run_background_worker(
    mut rx: mpsc::Receiver<BackgroundJob>,
    links: Arc<dyn LinkRepository>,
    monitor: Arc<HealthMonitor>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let (verify_tx, verify_rx) = mpsc::channel(concurrency * VERIFY_BACKLOG_PER_SLOT);
    let verifier = tokio::spawn(run_verifier(
        verify_rx,
        links.clone(),
        monitor.clone(),
        concurrency,
    ));

    let mut increments = JoinSet::new();

    while let Some(job) = rx.recv().await {
        match job {
            BackgroundJob::IncrementClicks { .. } => {
                let links = links.clone();
                let monitor = monitor.clone();
                increments.spawn(async move {
                    execute(job, links.as_ref(), monitor.as_ref()).await;
                });
            }
            BackgroundJob::Verify { .. } => {
                if let Err(e) = verify_tx.try_send(job) {
                    let job = e.into_inner();
                    warn!(token = job.token(), "Verification backlog full, dropping pass");
                    metrics::counter!("linkr_background_jobs_dropped_total", "kind" => job.kind())
                        .increment(1);
                }
            }
        }

        while increments.try_join_next().is_some() {}
    }

    drop(verify_tx);
    if let Err(e) = verifier.await {
        error!(error = %e, "Verification dispatcher panicked");
    }
    while increments.join_next().await.is_some() {}

    info!("Background worker stopped");
}

async fn run_verifier(
    mut rx: mpsc::Receiver<BackgroundJob>,
    links: Arc<dyn LinkRepository>,
    monitor: Arc<HealthMonitor>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut passes = JoinSet::new();

    while let Some(job) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let links = links.clone();
        let monitor = monitor.clone();
        passes.spawn(async move {
            let _permit = permit;
            execute(job, links.as_ref(), monitor.as_ref()).await;
        });

        while passes.try_join_next().is_some() {}
    }

    while passes.join_next().await.is_some() {}
}

/// Runs a single job to completion, logging failures.
pub async fn execute(job: BackgroundJob, links: &dyn LinkRepository, monitor: &HealthMonitor) {
    match job {
        BackgroundJob::IncrementClicks { token } => {
            if let Err(e) = links.increment_clicks(&token).await {
                warn!(token = %token, error = %e, "Failed to increment clicks");
            } else {
                debug!(token = %token, "Click recorded");
            }
        }
        BackgroundJob::Verify {
            link,
            referrer,
            user_agent,
        } => {
            monitor.verify(&link, &referrer, &user_agent).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::background_job::JobQueue;
    use crate::domain::entities::NewLink;
    use crate::domain::fetcher::MockFetcher;
    use crate::domain::repositories::{MockLinkRepository, MockStatsRepository};
    use crate::error::AppError;
    use crate::infrastructure::memory::{InMemoryLinkRepository, InMemoryStatsRepository};
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_worker_runs_increment_and_verify() {
        let links = Arc::new(InMemoryLinkRepository::new());
        let stats = Arc::new(InMemoryStatsRepository::new());
        let link = links
            .insert(NewLink::active("abc", "https://example.com"))
            .await;

        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(1).returning(|_| Ok(200));
        let monitor = Arc::new(HealthMonitor::new(
            links.clone(),
            stats.clone(),
            Arc::new(fetcher),
        ));

        let (queue, rx) = JobQueue::channel(8);
        let worker = tokio::spawn(run_background_worker(rx, links.clone(), monitor, 2));

        queue.schedule(BackgroundJob::IncrementClicks {
            token: "abc".to_string(),
        });
        queue.schedule(BackgroundJob::Verify {
            link,
            referrer: "https://google.com".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        });
        drop(queue);
        worker.await.unwrap();

        let stored = links.find_by_token("abc").await.unwrap().unwrap();
        assert_eq!(stored.clicks, 1);
        assert_eq!(stored.last_status_code, 200);
        assert_eq!(stats.len().await, 1);
    }

    struct StalledFetcher;

    #[async_trait::async_trait]
    impl crate::domain::fetcher::Fetcher for StalledFetcher {
        async fn fetch(&self, _url: &str) -> Result<u16, crate::domain::fetcher::FetchError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_increment_not_blocked_by_slow_verification() {
        let links = Arc::new(InMemoryLinkRepository::new());
        let stats = Arc::new(InMemoryStatsRepository::new());
        let link = links
            .insert(NewLink::active("abc", "https://slow.example"))
            .await;

        let monitor = Arc::new(HealthMonitor::new(
            links.clone(),
            stats.clone(),
            Arc::new(StalledFetcher),
        ));

        let (queue, rx) = JobQueue::channel(8);
        let worker = tokio::spawn(run_background_worker(rx, links.clone(), monitor, 1));

        queue.schedule(BackgroundJob::Verify {
            link,
            referrer: String::new(),
            user_agent: String::new(),
        });
        queue.schedule(BackgroundJob::IncrementClicks {
            token: "abc".to_string(),
        });

        let counted = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let stored = links.find_by_token("abc").await.unwrap().unwrap();
                if stored.clicks == 1 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        assert!(counted.is_ok(), "click was held back by a stalled verification");
        assert_eq!(stats.len().await, 0);

        worker.abort();
    }

    #[tokio::test]
    async fn test_increment_failure_is_swallowed() {
        let mut links = MockLinkRepository::new();
        links
            .expect_increment_clicks()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        let links: Arc<dyn LinkRepository> = Arc::new(links);

        let monitor = HealthMonitor::new(
            links.clone(),
            Arc::new(MockStatsRepository::new()),
            Arc::new(MockFetcher::new()),
        );

        execute(
            BackgroundJob::IncrementClicks {
                token: "abc".to_string(),
            },
            links.as_ref(),
            &monitor,
        )
        .await;
    }
}
