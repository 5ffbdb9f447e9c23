//! Outbound HTTP used to verify link destinations.

mod reqwest_fetcher;

pub use reqwest_fetcher::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_REDIRECTS, ReqwestFetcher};
