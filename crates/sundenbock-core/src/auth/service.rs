//! Collaborator traits for authentication.
//!
//! The HTTP implementations live outside this workspace; the session only
//! depends on these contracts.

use async_trait::async_trait;

use super::model::{AuthenticationRequest, AuthenticationResponse, RegistrationRequest};
use crate::user::UserProfile;

/// Exchanges credentials for a bearer token.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// `POST /auth/authenticate`
    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> anyhow::Result<AuthenticationResponse>;

    /// `POST /auth/register`
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> anyhow::Result<AuthenticationResponse>;
}

/// Loads the profile of the user the current bearer token belongs to.
#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// `GET /auth/me`
    async fn fetch_current_user(&self) -> anyhow::Result<UserProfile>;
}

/// Navigation side effect triggered when a session ends.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Navigator for hosts without a login view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self) {}
}
