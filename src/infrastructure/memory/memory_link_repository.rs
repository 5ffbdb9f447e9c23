//! In-process implementation of the link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NEVER_CHECKED, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link repository backed by a map keyed by token.
///
/// Used when no database is configured and as a real collaborator in tests.
/// Each mutation takes the write lock on its own, so click increments and status
/// updates interleave freely and status writes are last-write-wins.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: RwLock<HashMap<String, Link>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a link and returns the stored record.
    ///
    /// An existing link with the same token is replaced.
    pub async fn insert(&self, new_link: NewLink) -> Link {
        self.insert_with_status(new_link, NEVER_CHECKED).await
    }

    /// Seeds a link with a cached status already set.
    pub async fn insert_with_status(&self, new_link: NewLink, status_code: u16) -> Link {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let now = Utc::now();
        let link = Link::new(
            id,
            new_link.token.clone(),
            new_link.long_url,
            new_link.title,
            now,
            now,
            0,
            status_code,
            new_link.active,
        );

        self.links
            .write()
            .await
            .insert(new_link.token, link.clone());
        link
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.links.read().await.len()
    }

    /// Returns true if no links are stored.
    pub async fn is_empty(&self) -> bool {
        self.links.read().await.is_empty()
    }

    async fn sorted_by_clicks(&self, filter: impl Fn(&Link) -> bool) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .links
            .read()
            .await
            .values()
            .filter(|&l| filter(l))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.clicks.cmp(&a.clicks).then(a.id.cmp(&b.id)));
        links
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.read().await.get(token).cloned())
    }

    async fn increment_clicks(&self, token: &str) -> Result<(), AppError> {
        if let Some(link) = self.links.write().await.get_mut(token) {
            link.clicks += 1;
        }
        Ok(())
    }

    async fn update_status(&self, token: &str, status_code: u16) -> Result<(), AppError> {
        if let Some(link) = self.links.write().await.get_mut(token) {
            link.last_status_code = status_code;
            link.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut links = self.sorted_by_clicks(|l| l.clicks > 0).await;
        links.truncate(limit);
        Ok(links)
    }

    async fn broken(&self) -> Result<Vec<Link>, AppError> {
        Ok(self.sorted_by_clicks(Link::is_broken).await)
    }
}
