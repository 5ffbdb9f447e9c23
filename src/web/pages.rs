//! HTML pages rendered on the redirect path.

use askama::Template;
use askama_web::WebTemplate;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Direct-link page shown instead of redirecting when the cached status is bad.
///
/// Renders `templates/interstitial.html`.
#[derive(Template, WebTemplate)]
#[template(path = "interstitial.html")]
pub struct InterstitialTemplate {
    pub token: String,
    pub long_url: String,
}

/// Error page for unknown, inactive and failed lookups.
///
/// Renders `templates/error.html`.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: String,
    pub message: String,
}

impl ErrorTemplate {
    /// Builds the page for an application error.
    ///
    /// Internal errors never leak their message to the page.
    pub fn from_error(err: &AppError) -> Self {
        let status = err.status_code();
        let (title, message) = match err {
            AppError::Validation { message, .. } => ("Bad request", message.clone()),
            AppError::NotFound { message, .. } => ("Link not found", message.clone()),
            AppError::Gone { message, .. } => ("Link inactive", message.clone()),
            AppError::Internal { .. } => (
                "Something went wrong",
                "The server encountered an error while looking up this link.".to_string(),
            ),
        };

        Self {
            status: status.as_u16(),
            title: title.to_string(),
            message,
        }
    }
}

/// Renders `err` as an HTML error page with its status code.
pub fn error_page(err: &AppError) -> Response {
    let status = err.status_code();
    (status, ErrorTemplate::from_error(err)).into_response()
}

/// Renders the direct-link page with `200 OK`.
pub fn interstitial_page(token: &str, long_url: &str) -> Response {
    (
        StatusCode::OK,
        InterstitialTemplate {
            token: token.to_string(),
            long_url: long_url.to_string(),
        },
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interstitial_escapes_destination() {
        let page = InterstitialTemplate {
            token: "abc".to_string(),
            long_url: "https://example.com/?a=1&b=<2>".to_string(),
        };

        let html = page.render().unwrap();

        assert!(html.contains("/abc"));
        assert!(!html.contains("<2>"));
    }

    #[test]
    fn test_internal_error_hides_message() {
        let err = AppError::internal("connection refused by 10.0.0.5", json!({}));

        let page = ErrorTemplate::from_error(&err);

        assert_eq!(page.status, 500);
        assert!(!page.message.contains("10.0.0.5"));
    }

    #[test]
    fn test_gone_page() {
        let err = AppError::gone("The link /old is not currently active", json!({}));

        let page = ErrorTemplate::from_error(&err);

        assert_eq!(page.status, 410);
        assert_eq!(page.title, "Link inactive");
        assert!(page.render().unwrap().contains("/old is not currently active"));
    }
}
