//! Repository trait definitions for the domain layer.
//!
//! These traits are the narrow contracts of the Link Store and Stats Store. They are
//! implemented in `crate::infrastructure::persistence` (PostgreSQL) and
//! `crate::infrastructure::memory` (in-process).
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link lookup, click accounting and cached status updates
//! - [`StatsRepository`] - Append-only access stats
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod link_repository;
pub mod stats_repository;

pub use link_repository::LinkRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;
