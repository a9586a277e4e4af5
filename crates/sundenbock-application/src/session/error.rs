use sundenbock_core::SundenbockError;
use thiserror::Error;

/// Errors returned by [`SessionContext`](super::SessionContext) transitions.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// The authentication collaborator rejected the credentials. The session is
    /// unchanged.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The profile could not be loaded. The session has already been logged
    /// out when this is returned.
    #[error("Failed to load user profile: {0}")]
    ProfileFetch(String),

    /// The persistence substrate failed.
    #[error(transparent)]
    Storage(#[from] SundenbockError),
}

impl SessionError {
    /// Check if the session was ended by this error
    pub fn ended_session(&self) -> bool {
        matches!(self, Self::ProfileFetch(_))
    }
}

impl From<SessionError> for SundenbockError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Authentication(message) => SundenbockError::security(message),
            SessionError::ProfileFetch(message) => SundenbockError::remote(message),
            SessionError::Storage(inner) => inner,
        }
    }
}
