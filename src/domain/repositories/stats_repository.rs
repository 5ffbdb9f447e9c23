//! Repository trait for append-only access stats.

use crate::domain::entities::{AccessStat, NewAccessStat};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for access stats.
///
/// Records are never updated or deleted through this interface.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStatsRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Appends one access stat.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn append(&self, stat: NewAccessStat) -> Result<AccessStat, AppError>;

    /// Returns the most recent stats for a link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_for_link(&self, link_id: i64, limit: i64) -> Result<Vec<AccessStat>, AppError>;
}
