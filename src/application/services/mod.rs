//! Business logic services for the application layer.

pub mod health_monitor;
pub mod link_service;
pub mod resolution_service;

pub use health_monitor::{HealthMonitor, VerificationOutcome};
pub use link_service::LinkService;
pub use resolution_service::{RequestContext, Resolution, ResolutionService};
