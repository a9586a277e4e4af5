//! Domain core of the Sundenbock ticket tracker client.
//!
//! Holds the domain models, the declarative mapping engine that turns wire
//! records into those models, and the contracts (`auth`, `storage`, `clock`)
//! the session layer is built on. Nothing here performs I/O except
//! configuration loading.

pub mod auth;
pub mod clock;
pub mod comment;
pub mod config;
pub mod error;
pub mod mapping;
pub mod paging;
pub mod project;
pub mod storage;
pub mod ticket;
pub mod user;

// Re-export common error type
pub use error::{Result, SundenbockError};
