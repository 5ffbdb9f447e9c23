//! Small helpers shared across layers.
//!
//! - [`url_validation`] - Destination URL checks before probing

pub mod url_validation;
