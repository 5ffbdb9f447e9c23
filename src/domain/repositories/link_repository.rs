//! Repository trait for link lookup and mutation.

use crate::domain::entities::Link;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for links.
///
/// The two mutations, [`increment_clicks`](LinkRepository::increment_clicks) and
/// [`update_status`](LinkRepository::update_status), commit independently and are
/// never wrapped in a shared transaction. `update_status` is a blind overwrite:
/// when passes overlap, whichever finishes last wins.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found (active or not)
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_token(&self, token: &str) -> Result<Option<Link>, AppError>;

    /// Adds one to the click counter of the link with the given token.
    ///
    /// Unknown tokens are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_clicks(&self, token: &str) -> Result<(), AppError>;

    /// Overwrites the cached status of the link with the given token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn update_status(&self, token: &str, status_code: u16) -> Result<(), AppError>;

    /// Lists links with at least one click, most clicked first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn popular(&self, limit: i64) -> Result<Vec<Link>, AppError>;

    /// Lists links whose cached status is neither `0` nor `200`, most clicked first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn broken(&self) -> Result<Vec<Link>, AppError>;
}
