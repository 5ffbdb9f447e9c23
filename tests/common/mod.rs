#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use linkr::application::background_worker::execute;
use linkr::application::services::{HealthMonitor, LinkService, ResolutionService};
use linkr::domain::background_job::{BackgroundJob, JobQueue};
use linkr::domain::entities::{Link, NewLink};
use linkr::infrastructure::http::ReqwestFetcher;
use linkr::infrastructure::memory::{InMemoryLinkRepository, InMemoryStatsRepository};
use linkr::state::AppState;

pub const BASE_URL: &str = "https://s.example.com";

/// Application wired to in-memory stores, with the job queue left undrained so
/// tests decide when background work runs.
pub struct TestApp {
    pub links: Arc<InMemoryLinkRepository>,
    pub stats: Arc<InMemoryStatsRepository>,
    pub state: AppState,
    pub jobs: mpsc::Receiver<BackgroundJob>,
    pub monitor: HealthMonitor,
}

impl TestApp {
    pub async fn seed(&self, token: &str, url: &str) -> Link {
        self.links.insert(NewLink::active(token, url)).await
    }

    pub async fn seed_with_status(&self, token: &str, url: &str, status: u16) -> Link {
        self.links
            .insert_with_status(NewLink::active(token, url), status)
            .await
    }

    pub async fn seed_inactive(&self, token: &str, url: &str) -> Link {
        self.links
            .insert(NewLink::active(token, url).inactive())
            .await
    }

    pub async fn link(&self, token: &str) -> Link {
        use linkr::domain::repositories::LinkRepository;
        self.links.find_by_token(token).await.unwrap().unwrap()
    }

    /// Takes every queued job without running it.
    pub fn take_jobs(&mut self) -> Vec<BackgroundJob> {
        let mut jobs = Vec::new();
        while let Ok(job) = self.jobs.try_recv() {
            jobs.push(job);
        }
        jobs
    }

    /// Runs every queued job to completion, in order. Returns how many ran.
    pub async fn run_jobs(&mut self) -> usize {
        let jobs = self.take_jobs();
        let count = jobs.len();
        for job in jobs {
            execute(job, self.links.as_ref(), &self.monitor).await;
        }
        count
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_fetcher(Duration::from_secs(2), 5)
}

pub fn create_test_app_with_fetcher(timeout: Duration, max_redirects: usize) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::new());
    let stats = Arc::new(InMemoryStatsRepository::new());

    let (job_queue, jobs) = JobQueue::channel(100);
    let fetcher = ReqwestFetcher::new(timeout, max_redirects).unwrap();
    let monitor = HealthMonitor::new(links.clone(), stats.clone(), Arc::new(fetcher));

    let state = AppState::new(
        Arc::new(ResolutionService::new(links.clone(), job_queue.clone())),
        Arc::new(LinkService::new(links.clone())),
        job_queue,
        BASE_URL,
    );

    TestApp {
        links,
        stats,
        state,
        jobs,
        monitor,
    }
}
