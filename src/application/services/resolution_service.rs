//! Token resolution: the user-facing redirect decision.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error};

use crate::domain::background_job::{BackgroundJob, JobQueue};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// What the caller should be shown for a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No link exists for the token.
    NotFound,
    /// The link exists but is disabled.
    Inactive,
    /// Redirect straight to the destination.
    RedirectNow(String),
    /// Show a direct-link page because the last check saw a problem.
    ShowInterstitial(String),
}

/// Request metadata carried into the verification pass.
///
/// Missing headers are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub referrer: String,
    pub user_agent: String,
}

impl RequestContext {
    pub fn new(referrer: Option<&str>, user_agent: Option<&str>) -> Self {
        Self {
            referrer: referrer.unwrap_or_default().to_string(),
            user_agent: user_agent.unwrap_or_default().to_string(),
        }
    }
}

/// Resolves tokens to a redirect decision.
///
/// The decision uses only the status cached by earlier verification passes; the
/// pass triggered by this call runs later on the background worker. Latency is
/// therefore one store lookup regardless of how slow the destination is.
pub struct ResolutionService {
    links: Arc<dyn LinkRepository>,
    jobs: JobQueue,
}

impl ResolutionService {
    pub fn new(links: Arc<dyn LinkRepository>, jobs: JobQueue) -> Self {
        Self { links, jobs }
    }

    /// Resolves `token` and schedules click accounting and verification.
    ///
    /// For a found, active link exactly one click increment and one verification
    /// pass are scheduled, whatever the decision. Unknown and inactive tokens
    /// schedule nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty token and
    /// [`AppError::Internal`] if the lookup itself fails.
    pub async fn resolve(&self, token: &str, ctx: RequestContext) -> Result<Resolution, AppError> {
        if token.is_empty() {
            return Err(AppError::bad_request("Token must not be empty", json!({})));
        }

        let link = match self.links.find_by_token(token).await {
            Ok(Some(link)) => link,
            Ok(None) => {
                debug!(token, "Token not found");
                return Ok(Resolution::NotFound);
            }
            Err(e) => {
                error!(token, error = %e, "Link lookup failed");
                return Err(AppError::internal(
                    "Failed to look up link",
                    json!({ "token": token }),
                ));
            }
        };

        if !link.active {
            debug!(token, "Link is inactive");
            return Ok(Resolution::Inactive);
        }

        let resolution = if link.redirects_immediately() {
            Resolution::RedirectNow(link.long_url.clone())
        } else {
            Resolution::ShowInterstitial(link.long_url.clone())
        };

        debug!(
            token,
            cached_status = link.last_status_code,
            ?resolution,
            "Token resolved"
        );

        self.jobs.schedule(BackgroundJob::IncrementClicks {
            token: link.token.clone(),
        });
        self.jobs.schedule(BackgroundJob::Verify {
            link,
            referrer: ctx.referrer,
            user_agent: ctx.user_agent,
        });

        Ok(resolution)
    }
}
