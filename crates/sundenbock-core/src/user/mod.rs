//! User domain module.
//!
//! This module contains the user profile domain model and the capability
//! queries derived from it.
//!
//! # Module Structure
//!
//! - `model`: User profile domain model and self-update patches
//!
//! # Usage
//!
//! ```ignore
//! use sundenbock_core::user::UserProfile;
//! ```

mod model;

// Re-export public API
pub use model::{UserPatch, UserProfile, contains_all, contains_any};

/// A user record as returned by the user administration endpoints.
pub type User = UserProfile;
