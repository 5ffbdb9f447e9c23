//! JSON view of a single link.

use axum::{
    Json,
    http::header,
    response::{IntoResponse, Response},
};

use super::NO_STORE;
use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored record for `token` as JSON.
///
/// # Endpoint
///
/// `GET /{token}.json` (dispatched from [`super::redirect_handler`])
///
/// Inactive links are returned as well; nothing is counted or verified.
///
/// # Errors
///
/// Returns 404 Not Found if the token doesn't exist.
pub async fn link_info_response(state: &AppState, token: &str) -> Result<Response, AppError> {
    let link = state.link_service.get_link(token).await?;

    Ok((
        [(header::CACHE_CONTROL, NO_STORE)],
        Json(LinkResponse::from_link(link, &state.base_url)),
    )
        .into_response())
}
