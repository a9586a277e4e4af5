//! Authentication domain module.
//!
//! # Module Structure
//!
//! - `model`: wire models (`AuthenticationRequest`, `AuthenticationResponse`),
//!   decoded token `Claims`, and the persisted `StoredToken`
//! - `service`: collaborator traits the session depends on
//!   (`AuthClient`, `ProfileClient`, `Navigator`)

mod model;
mod service;

// Re-export public API
pub use model::{
    AuthenticationRequest, AuthenticationResponse, Claims, RegistrationRequest, StoredToken,
    epoch_seconds,
};
pub use service::{AuthClient, Navigator, NoopNavigator, ProfileClient};
