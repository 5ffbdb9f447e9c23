//! Link entity representing a token-to-destination mapping.

use chrono::{DateTime, Utc};

/// Cached status value for a link that has never been verified.
pub const NEVER_CHECKED: u16 = 0;

/// The only observed status that allows an immediate redirect.
pub const HEALTHY_STATUS: u16 = 200;

/// A short link with its cached verification state.
///
/// `last_status_code` holds the status observed by the most recent *completed*
/// verification pass. It can lag behind the destination's real state; concurrent
/// passes overwrite it last-write-wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub token: String,
    pub long_url: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub clicks: i64,
    pub last_status_code: u16,
    pub active: bool,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        token: String,
        long_url: String,
        title: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        clicks: i64,
        last_status_code: u16,
        active: bool,
    ) -> Self {
        Self {
            id,
            token,
            long_url,
            title,
            created_at,
            updated_at,
            clicks,
            last_status_code,
            active,
        }
    }

    /// Returns true if no verification pass has completed for this link yet.
    pub fn is_unchecked(&self) -> bool {
        self.last_status_code == NEVER_CHECKED
    }

    /// Returns true if the cached status allows redirecting without an interstitial.
    ///
    /// Only an exact `200` or a never-checked link qualifies; every other code,
    /// including other 2xx and 3xx values, sends the caller to the direct-link page.
    pub fn redirects_immediately(&self) -> bool {
        self.last_status_code == HEALTHY_STATUS || self.is_unchecked()
    }

    /// Returns true if the cached status marks the destination as possibly broken.
    pub fn is_broken(&self) -> bool {
        !self.redirects_immediately()
    }
}

/// Input data for seeding a link.
///
/// Link creation is owned by an outside flow; this type exists so stores can be
/// populated in tests and fixtures.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub token: String,
    pub long_url: String,
    pub title: Option<String>,
    pub active: bool,
}

impl NewLink {
    /// Creates an active link with no title.
    pub fn active(token: impl Into<String>, long_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            long_url: long_url.into(),
            title: None,
            active: true,
        }
    }

    /// Marks the link as disabled.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
