//! Browser-facing HTML pages.
//!
//! Uses Askama templates from `templates/` for server-side rendering.
//!
//! # Modules
//!
//! - [`pages`] - Interstitial and error pages for the redirect path

pub mod pages;
