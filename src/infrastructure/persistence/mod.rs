//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//! The schema lives in `migrations/` and is applied at startup.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link lookup, click accounting and status updates
//! - [`PgStatsRepository`] - Append-only access stats

pub mod pg_link_repository;
pub mod pg_stats_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_stats_repository::PgStatsRepository;
