//! Session state and its published snapshot.

use sundenbock_core::auth::Claims;
use sundenbock_core::user::{UserProfile, contains_all, contains_any};
use sundenbock_infrastructure::jwt;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No token.
    Anonymous,
    /// Token present, profile not loaded yet.
    PendingProfile,
    /// Token and profile present.
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProfileLoad {
    Idle,
    Loading,
    Loaded,
}

/// Mutable session state. Only `SessionContext` touches it, always under its
/// lock, and publishes a fresh snapshot after every change.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) raw_token: Option<String>,
    pub(crate) claims: Option<Claims>,
    pub(crate) expiry_epoch_seconds: Option<i64>,
    pub(crate) profile: Option<UserProfile>,
    pub(crate) load: ProfileLoad,
    /// Bumped whenever the token changes; a fetch started under an older
    /// generation must not install its result.
    pub(crate) generation: u64,
}

impl SessionState {
    pub(crate) fn anonymous() -> Self {
        Self {
            raw_token: None,
            claims: None,
            expiry_epoch_seconds: None,
            profile: None,
            load: ProfileLoad::Idle,
            generation: 0,
        }
    }

    /// Replaces the token. The cached profile is dropped in the same step.
    pub(crate) fn install_token(&mut self, token: Option<String>) {
        let claims = token.as_deref().and_then(jwt::decode_claims);
        self.expiry_epoch_seconds = claims.as_ref().and_then(|c| c.exp);
        self.claims = claims;
        self.raw_token = token;
        self.profile = None;
        self.load = ProfileLoad::Idle;
        self.generation += 1;
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        match (&self.raw_token, &self.profile) {
            (None, _) => SessionPhase::Anonymous,
            (Some(_), None) => SessionPhase::PendingProfile,
            (Some(_), Some(_)) => SessionPhase::Authenticated,
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let (roles, permissions) = match (&self.profile, &self.claims) {
            (Some(profile), _) => (profile.roles.clone(), profile.permissions.clone()),
            (None, Some(claims)) => (claims.roles.clone(), claims.permissions.clone()),
            (None, None) => (Vec::new(), Vec::new()),
        };
        let username = self
            .profile
            .as_ref()
            .map(|p| p.username.clone())
            .or_else(|| self.claims.as_ref().and_then(|c| c.sub.clone()));

        SessionSnapshot {
            phase: self.phase(),
            username,
            roles,
            permissions,
            profile: self.profile.clone(),
            claims: self.claims.clone(),
            expiry_epoch_seconds: self.expiry_epoch_seconds,
            profile_loading: self.load == ProfileLoad::Loading,
            generation: self.generation,
        }
    }
}

/// Derived view of the session, consistent with the token and profile it was
/// computed from. Never contains the token itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub username: Option<String>,
    /// Profile roles once loaded, token claims before that.
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub profile: Option<UserProfile>,
    pub claims: Option<Claims>,
    pub expiry_epoch_seconds: Option<i64>,
    pub profile_loading: bool,
    pub generation: u64,
}

impl SessionSnapshot {
    pub fn is_logged_in(&self) -> bool {
        self.phase != SessionPhase::Anonymous
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        contains_any(&self.roles, roles)
    }

    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        contains_all(&self.roles, roles)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        contains_any(&self.permissions, permissions)
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        contains_all(&self.permissions, permissions)
    }

    /// True iff an expiry is known and `now >= expiry - grace`.
    pub fn is_expired_at(&self, now_epoch_seconds: i64, grace_seconds: i64) -> bool {
        self.expiry_epoch_seconds
            .is_some_and(|exp| now_epoch_seconds >= exp.saturating_sub(grace_seconds))
    }
}
