//! Handler for the most clicked links.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use super::NO_STORE;
use crate::api::dto::link::{LinkResponse, PopularQuery};
use crate::application::services::link_service::parse_limit;
use crate::error::AppError;
use crate::state::AppState;

/// Lists links with at least one click, most clicked first.
///
/// # Endpoint
///
/// `GET /popular.json?n=20`
///
/// # Query Parameters
///
/// - `n` (optional): number of links (default: 20, max: 500). A value that is
///   not a number falls back to the default.
pub async fn popular_handler(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = parse_limit(query.n.as_deref());

    let links = state.link_service.popular(limit).await?;
    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| LinkResponse::from_link(link, &state.base_url))
        .collect();

    Ok(([(header::CACHE_CONTROL, NO_STORE)], Json(items)))
}
