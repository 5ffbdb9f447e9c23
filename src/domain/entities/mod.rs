//! Core domain entities.
//!
//! - [`Link`] - A token mapped to a destination, with its cached verification status
//! - [`AccessStat`] - A write-once record produced by each verification pass
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewLink`, `NewAccessStat`).

pub mod access_stat;
pub mod link;

pub use access_stat::{AccessStat, NewAccessStat};
pub use link::{HEALTHY_STATUS, Link, NEVER_CHECKED, NewLink};
