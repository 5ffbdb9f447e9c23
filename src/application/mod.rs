//! Application layer: services and the background worker.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolution_service::ResolutionService`] - Redirect decision and job scheduling
//! - [`services::health_monitor::HealthMonitor`] - Destination verification passes
//! - [`services::link_service::LinkService`] - Read-only link queries
//!
//! [`background_worker`] runs the jobs the resolution service schedules.

pub mod background_worker;
pub mod services;
