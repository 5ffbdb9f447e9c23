//! Contract for probing a destination URL.

use async_trait::async_trait;
use std::time::Duration;

/// Reasons a probe produced no usable response status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid destination URL: {0}")]
    InvalidUrl(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("more than {0} redirects")]
    TooManyRedirects(usize),

    #[error("network error: {0}")]
    Network(String),
}

/// Performs a single bounded request against a destination.
///
/// Implementations follow redirects themselves and return the status of the
/// terminal response. A chain longer than the configured cap is an error, not a
/// truncated success.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::ReqwestFetcher`] - `reqwest`-backed client
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and returns the terminal response status code.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the destination is unreachable, times out,
    /// redirects too often or is not a fetchable URL.
    async fn fetch(&self, url: &str) -> Result<u16, FetchError>;
}
