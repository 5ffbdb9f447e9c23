//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod broken;
pub mod health;
pub mod link_info;
pub mod popular;
pub mod redirect;

pub use broken::broken_handler;
pub use health::health_handler;
pub use link_info::link_info_response;
pub use popular::popular_handler;
pub use redirect::{head_not_allowed, redirect_handler};

/// `Cache-Control` for JSON views of link state, which changes on every click.
pub(crate) const NO_STORE: &str = "no-cache, no-store, private, max-age=0";
