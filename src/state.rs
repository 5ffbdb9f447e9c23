//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{LinkService, ResolutionService};
use crate::domain::background_job::JobQueue;

/// State cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub resolution_service: Arc<ResolutionService>,
    pub link_service: Arc<LinkService>,
    /// Kept for health reporting; the resolution service owns its own handle.
    pub job_queue: JobQueue,
    /// Public base URL without a trailing slash, used to build short URLs.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        resolution_service: Arc<ResolutionService>,
        link_service: Arc<LinkService>,
        job_queue: JobQueue,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            resolution_service,
            link_service,
            job_queue,
            base_url: base_url.into(),
        }
    }
}
