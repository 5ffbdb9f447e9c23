//! In-process implementation of the stats repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::entities::{AccessStat, NewAccessStat};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Append-only stats log kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryStatsRepository {
    stats: RwLock<Vec<AccessStat>>,
}

impl InMemoryStatsRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded stat in insertion order.
    pub async fn all(&self) -> Vec<AccessStat> {
        self.stats.read().await.clone()
    }

    /// Number of recorded stats.
    pub async fn len(&self) -> usize {
        self.stats.read().await.len()
    }

    /// Returns true if nothing has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.stats.read().await.is_empty()
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn append(&self, stat: NewAccessStat) -> Result<AccessStat, AppError> {
        let stat = AccessStat::from(stat);
        self.stats.write().await.push(stat.clone());
        Ok(stat)
    }

    async fn list_for_link(&self, link_id: i64, limit: i64) -> Result<Vec<AccessStat>, AppError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .stats
            .read()
            .await
            .iter()
            .rev()
            .filter(|s| s.link_id == link_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
