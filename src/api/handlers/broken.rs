//! Handler for links whose last check failed.

use axum::{Json, extract::State, http::header, response::IntoResponse};

use super::NO_STORE;
use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links whose cached status is neither `0` nor `200`, most clicked first.
///
/// # Endpoint
///
/// `GET /broken.json`
pub async fn broken_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let items: Vec<LinkResponse> = state
        .link_service
        .broken()
        .await?
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &state.base_url))
        .collect();

    Ok(([(header::CACHE_CONTROL, NO_STORE)], Json(items)))
}
