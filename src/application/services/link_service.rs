//! Read-only link queries backing the JSON endpoints and admin tooling.

use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use serde_json::json;

/// Number of links returned by listing queries when the caller gives no limit.
pub const DEFAULT_RESULT_COUNT: i64 = 20;

/// Upper bound on a caller-supplied listing limit.
pub const MAX_RESULT_COUNT: i64 = 500;

/// Service for looking up and listing links without side effects.
///
/// Unlike [`super::ResolutionService`], nothing here counts clicks or schedules
/// verification.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self { link_repository }
    }

    /// Retrieves a link by token, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the token.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_link(&self, token: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "token": token })))
    }

    /// Lists the most clicked links.
    ///
    /// `limit` is clamped to `1..=MAX_RESULT_COUNT`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn popular(&self, limit: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository
            .popular(limit.clamp(1, MAX_RESULT_COUNT))
            .await
    }

    /// Lists links whose last check did not return `200`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn broken(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.broken().await
    }

    /// Runs a cheap query to confirm the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_repository.popular(1).await.map(|_| ())
    }
}

/// Parses a listing limit from a query string value.
///
/// Missing or malformed values fall back to [`DEFAULT_RESULT_COUNT`].
pub fn parse_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_RESULT_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn create_test_link(id: i64, token: &str, clicks: i64, status: u16) -> Link {
        let now = Utc::now();
        Link::new(
            id,
            token.to_string(),
            "https://example.com".to_string(),
            None,
            now,
            now,
            clicks,
            status,
            true,
        )
    }

    #[tokio::test]
    async fn test_get_link_success() {
        let mut mock_repo = MockLinkRepository::new();
        let link = create_test_link(1, "abc", 3, 200);
        mock_repo
            .expect_find_by_token()
            .withf(|token| token == "abc")
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service.get_link("abc").await.unwrap();
        assert_eq!(link.token, "abc");
        assert_eq!(link.clicks, 3);
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_token()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_increment_clicks().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.get_link("ghost").await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_popular_clamps_limit() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_popular()
            .withf(|limit| *limit == MAX_RESULT_COUNT)
            .times(1)
            .returning(|_| Ok(vec![]));
        mock_repo
            .expect_popular()
            .withf(|limit| *limit == 1)
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = LinkService::new(Arc::new(mock_repo));

        service.popular(10_000).await.unwrap();
        service.popular(-5).await.unwrap();
    }

    #[tokio::test]
    async fn test_broken_passes_through() {
        let mut mock_repo = MockLinkRepository::new();
        let dead = create_test_link(2, "dead", 9, 503);
        mock_repo
            .expect_broken()
            .times(1)
            .returning(move || Ok(vec![dead.clone()]));

        let service = LinkService::new(Arc::new(mock_repo));

        let broken = service.broken().await.unwrap();
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].last_status_code, 503);
    }

    #[tokio::test]
    async fn test_check_store_reports_errors() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_popular()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = LinkService::new(Arc::new(mock_repo));

        assert!(service.check_store().await.is_err());
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), DEFAULT_RESULT_COUNT);
        assert_eq!(parse_limit(Some("5")), 5);
        assert_eq!(parse_limit(Some(" 7 ")), 7);
        assert_eq!(parse_limit(Some("lots")), DEFAULT_RESULT_COUNT);
    }
}
