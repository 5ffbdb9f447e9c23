//! Data Transfer Objects for API responses.
//!
//! Domain entities carry no serde derives; handlers map them into these types.

pub mod health;
pub mod link;
