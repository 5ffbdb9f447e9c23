//! Handler for token redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use super::link_info::link_info_response;
use crate::application::services::{RequestContext, Resolution};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validation::validate_destination;
use crate::web::pages::{error_page, interstitial_page};

/// Resolves a token and sends the caller on.
///
/// # Endpoint
///
/// `GET /{token}`
///
/// `GET /{token}.json` is routed here too and answered by
/// [`link_info_response`] without counting a click.
///
/// # Response Codes
///
/// - **303 See Other**: destination last checked healthy, or never checked
/// - **200 OK**: direct-link page, the last check saw a problem
/// - **404 Not Found**: unknown token
/// - **410 Gone**: link is inactive
/// - **500 Internal Server Error**: link store failure, or a stored destination
///   that is not an http(s) URL
///
/// The click increment and verification pass are scheduled by the resolution
/// service and never delay the response.
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Some(token) = token.strip_suffix(".json") {
        return link_info_response(&state, token).await.into_response();
    }

    let ctx = RequestContext::new(
        header_str(&headers, header::REFERER),
        header_str(&headers, header::USER_AGENT),
    );

    match state.resolution_service.resolve(&token, ctx).await {
        Ok(Resolution::RedirectNow(url)) => match checked_destination(&token, &url) {
            Ok(()) => see_other(&url),
            Err(page) => page,
        },
        Ok(Resolution::ShowInterstitial(url)) => match checked_destination(&token, &url) {
            Ok(()) => interstitial_page(&token, &url),
            Err(page) => page,
        },
        Ok(Resolution::NotFound) => error_page(&AppError::not_found(
            format!("The link /{} could not be found.", token),
            json!({ "token": token }),
        )),
        Ok(Resolution::Inactive) => error_page(&AppError::gone(
            format!("The link /{} is not currently active.", token),
            json!({ "token": token }),
        )),
        Err(e) => error_page(&e),
    }
}

/// Answers `HEAD /{token}` without resolving, so previews and uptime checks
/// neither count clicks nor trigger verification passes.
pub async fn head_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static("GET"))],
    )
        .into_response()
}

/// Refuses to hand out stored destinations that are not plain http(s) URLs.
fn checked_destination(token: &str, url: &str) -> Result<(), Response> {
    validate_destination(url).map(|_| ()).map_err(|e| {
        error!(token, url, error = %e, "Stored destination is not an http(s) URL");
        error_page(&AppError::internal(
            "Invalid destination",
            json!({ "token": token }),
        ))
    })
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn see_other(url: &str) -> Response {
    match HeaderValue::from_str(url) {
        Ok(location) => (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            error!(url, error = %e, "Stored destination is not a valid Location header");
            error_page(&AppError::internal(
                "Invalid destination",
                json!({ "url": url }),
            ))
        }
    }
}
