//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`http`] - Destination probing over HTTP(S)
//! - [`memory`] - In-process stores
//! - [`persistence`] - PostgreSQL repository implementations

pub mod http;
pub mod memory;
pub mod persistence;
