//! `reqwest` implementation of the destination probe.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;

use crate::domain::fetcher::{FetchError, Fetcher};
use crate::utils::url_validation::validate_destination;

/// Default overall timeout for a single probe.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of redirect hops followed before giving up.
///
/// Some destinations chain far more redirects than a typical client allows,
/// so this sits well above the usual default of 10.
pub const DEFAULT_MAX_REDIRECTS: usize = 30;

/// Probes destinations with a single shared `reqwest` client.
///
/// The client applies the overall timeout to the whole redirect chain and stops
/// with an error once more than `max_redirects` hops have been followed.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_redirects: usize,
}

impl ReqwestFetcher {
    /// Builds a fetcher with the given timeout and redirect cap.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(max_redirects))
            .user_agent(concat!("linkr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            timeout,
            max_redirects,
        })
    }

    /// Configured redirect cap.
    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Configured overall timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if e.is_redirect() {
            FetchError::TooManyRedirects(self.max_redirects)
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<u16, FetchError> {
        let url = validate_destination(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        debug!(url = %url, final_url = %response.url(), status, "Destination probed");

        Ok(status)
    }
}
