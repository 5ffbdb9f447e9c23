//! DTOs for link info and listings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Public view of a link and its cached verification state.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub token: String,
    pub short_url: String,
    pub long_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub clicks: i64,
    /// `0` until the first verification pass completes.
    pub last_status_code: u16,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: format!("{}/{}", base_url, link.token),
            token: link.token,
            long_url: link.long_url,
            title: link.title,
            clicks: link.clicks,
            last_status_code: link.last_status_code,
            active: link.active,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Query parameters for `GET /popular.json`.
///
/// `n` is kept as a raw string so a malformed value falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, serde::Deserialize)]
pub struct PopularQuery {
    pub n: Option<String>,
}
