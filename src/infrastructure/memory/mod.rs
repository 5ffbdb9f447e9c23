//! In-process repository implementations.
//!
//! Used when `DATABASE_URL` is not configured and as real collaborators in tests.
//! Data does not survive a restart.

mod memory_link_repository;
mod memory_stats_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use memory_stats_repository::InMemoryStatsRepository;
