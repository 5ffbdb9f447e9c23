//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Link Store and Stats Store contracts
//! - [`fetcher`] - Destination probe contract
//! - [`background_job`] - Jobs the resolution path hands off without waiting
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])
//!
//! # Redirect Flow
//!
//! 1. HTTP handler asks the resolution service for a decision
//! 2. The decision is made from the link's cached status alone
//! 3. A click increment and a verification pass are queued as [`background_job::BackgroundJob`]s
//! 4. The background worker runs them after the response has been sent

pub mod background_job;
pub mod entities;
pub mod fetcher;
pub mod repositories;
