use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use sundenbock_core::auth::{
    AuthClient, AuthenticationRequest, AuthenticationResponse, Claims, Navigator, ProfileClient,
    RegistrationRequest,
};
use sundenbock_core::config::AuthSettings;
use sundenbock_core::storage::StorageEvent;
use sundenbock_core::ticket::Actor;
use sundenbock_core::user::UserProfile;
use sundenbock_infrastructure::TokenStore;

use super::error::SessionError;
use super::state::{ProfileLoad, SessionPhase, SessionSnapshot, SessionState};

/// Outcome of reconciling with a storage change made by another tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSync {
    /// The change concerned another key.
    Ignored,
    /// The stored token still matches the session.
    Unchanged,
    /// Another tab stored a different token; the profile must be reloaded.
    TokenChanged,
    /// The token disappeared; the session was logged out.
    LoggedOut,
}

enum LoadStep {
    Done(Option<UserProfile>),
    Wait(u64),
    Fetch(u64),
}

/// The one session of a running client.
///
/// Combines the [`TokenStore`] with a lazily fetched [`UserProfile`] and
/// exposes role and permission queries over the derived state. Every mutating
/// call publishes a new [`SessionSnapshot`] before it returns.
///
/// # Profile loading
///
/// The profile is fetched at most once per token. Callers that arrive while a
/// fetch is in flight wait for its result instead of issuing their own. A
/// failed fetch ends the session.
pub struct SessionContext {
    tokens: TokenStore,
    auth: Arc<dyn AuthClient>,
    profiles: Arc<dyn ProfileClient>,
    navigator: Arc<dyn Navigator>,
    settings: AuthSettings,
    state: Mutex<SessionState>,
    published: watch::Sender<SessionSnapshot>,
}

impl SessionContext {
    /// Creates the session, adopting a valid token already in storage.
    ///
    /// The token store uses `settings.expiry_grace_seconds` from here on.
    pub fn new(
        tokens: TokenStore,
        auth: Arc<dyn AuthClient>,
        profiles: Arc<dyn ProfileClient>,
        navigator: Arc<dyn Navigator>,
        settings: AuthSettings,
    ) -> Result<Self, SessionError> {
        let tokens = tokens.with_grace_seconds(settings.expiry_grace_seconds);

        let mut state = SessionState::anonymous();
        if let Some(token) = tokens.get_token()? {
            state.install_token(Some(token));
        }
        let (published, _) = watch::channel(state.snapshot());
        tracing::debug!(phase = ?state.phase(), "Session context created");

        Ok(Self {
            tokens,
            auth,
            profiles,
            navigator,
            settings,
            state: Mutex::new(state),
            published,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &SessionState) {
        self.published.send_replace(state.snapshot());
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Authenticates and, on success, stores the token and loads the profile.
    pub async fn login(
        &self,
        request: &AuthenticationRequest,
        remember: bool,
    ) -> Result<SessionSnapshot, SessionError> {
        tracing::info!(username = %request.username, remember, "Logging in");
        let response = self
            .auth
            .authenticate(request)
            .await
            .map_err(|e| rejected(&request.username, e))?;
        self.accept(response, remember).await
    }

    /// Registers a new account and signs in with the returned token.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
        remember: bool,
    ) -> Result<SessionSnapshot, SessionError> {
        tracing::info!(username = %request.username, "Registering");
        let response = self
            .auth
            .register(request)
            .await
            .map_err(|e| rejected(&request.username, e))?;
        self.accept(response, remember).await
    }

    async fn accept(
        &self,
        response: AuthenticationResponse,
        remember: bool,
    ) -> Result<SessionSnapshot, SessionError> {
        self.set_token(&response.access_token, remember).await
    }

    /// Replaces the token, drops any cached profile and loads it again.
    pub async fn set_token(
        &self,
        token: &str,
        remember: bool,
    ) -> Result<SessionSnapshot, SessionError> {
        self.store_token(token, remember)?;
        self.ensure_profile_loaded().await?;
        Ok(self.snapshot())
    }

    /// Stores the token and resets the profile without fetching it.
    pub fn store_token(&self, token: &str, remember: bool) -> Result<(), SessionError> {
        let mut state = self.lock();
        self.tokens.set_token(token, remember)?;
        state.install_token(Some(token.to_string()));
        self.publish(&state);
        tracing::info!(remember, generation = state.generation, "Session token stored");
        Ok(())
    }

    /// Ends the session. With `redirect`, the navigator is sent to the login view.
    pub fn logout(&self, redirect: bool) -> Result<(), SessionError> {
        tracing::info!(redirect, "Logging out");
        self.end_session(self.lock(), redirect)
    }

    /// Resets the state, clears storage, then releases the lock before
    /// navigating so the navigator may query the session.
    fn end_session(
        &self,
        mut state: MutexGuard<'_, SessionState>,
        redirect: bool,
    ) -> Result<(), SessionError> {
        state.install_token(None);
        self.publish(&state);
        let cleared = self.tokens.clear();
        drop(state);

        if redirect {
            self.navigator.redirect_to_login();
        }
        cleared.map_err(SessionError::from)
    }

    /// Loads the profile for the current token unless it is loaded or loading.
    ///
    /// Returns `None` when there is no session. A fetch failure logs the
    /// session out and is returned as [`SessionError::ProfileFetch`]; callers
    /// that were only waiting on that fetch get `None`.
    pub async fn ensure_profile_loaded(&self) -> Result<Option<UserProfile>, SessionError> {
        loop {
            let step = {
                let mut state = self.lock();
                match (state.raw_token.is_some(), state.load) {
                    (false, _) => LoadStep::Done(None),
                    (true, ProfileLoad::Loaded) => LoadStep::Done(state.profile.clone()),
                    (true, ProfileLoad::Loading) => LoadStep::Wait(state.generation),
                    (true, ProfileLoad::Idle) => {
                        state.load = ProfileLoad::Loading;
                        self.publish(&state);
                        LoadStep::Fetch(state.generation)
                    }
                }
            };

            match step {
                LoadStep::Done(profile) => return Ok(profile),
                LoadStep::Wait(generation) => self.wait_for_load(generation).await,
                LoadStep::Fetch(generation) => {
                    if let Some(profile) = self.fetch_profile(generation).await? {
                        return Ok(Some(profile));
                    }
                }
            }
        }
    }

    async fn wait_for_load(&self, generation: u64) {
        let mut snapshots = self.published.subscribe();
        // The sender lives as long as `self`, so this only returns once the
        // load settled or the token changed.
        let _ = snapshots
            .wait_for(|s| s.generation != generation || !s.profile_loading)
            .await;
    }

    async fn fetch_profile(&self, generation: u64) -> Result<Option<UserProfile>, SessionError> {
        let guard = LoadGuard {
            session: self,
            generation,
            armed: true,
        };
        tracing::debug!(generation, "Loading user profile");
        let result = self.profiles.fetch_current_user().await;
        guard.disarm();

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(generation, "Discarding profile fetched for a replaced token");
            return Ok(None);
        }

        match result {
            Ok(profile) => {
                tracing::info!(username = %profile.username, "User profile loaded");
                state.profile = Some(profile.clone());
                state.load = ProfileLoad::Loaded;
                self.publish(&state);
                Ok(Some(profile))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed, ending session");
                self.end_session(state, true)?;
                Err(SessionError::ProfileFetch(e.to_string()))
            }
        }
    }

    /// Replaces the cached profile after the signed-in user edited it.
    ///
    /// Ignored (returns false) when nobody is signed in or `profile` belongs
    /// to someone other than the current user.
    pub fn replace_profile(&self, profile: UserProfile) -> bool {
        let mut state = self.lock();
        let current = state
            .profile
            .as_ref()
            .map(|p| p.username.as_str())
            .or_else(|| state.claims.as_ref().and_then(|c| c.sub.as_deref()));
        if state.raw_token.is_none() || current != Some(profile.username.as_str()) {
            tracing::debug!(username = %profile.username, "Ignoring profile for another session");
            return false;
        }

        tracing::debug!(
            generation = state.generation,
            username = %profile.username,
            "Cached profile replaced"
        );
        state.profile = Some(profile);
        state.load = ProfileLoad::Loaded;
        self.publish(&state);
        true
    }

    /// Returns the bearer token for an outgoing request.
    ///
    /// Expiry is checked here: an expired token is cleared and the session is
    /// logged out with a redirect. A token changed by another tab is adopted.
    pub fn token(&self) -> Result<Option<String>, SessionError> {
        let mut state = self.lock();
        match self.tokens.get_token()? {
            None if state.raw_token.is_some() => {
                tracing::info!("Session token expired or removed, logging out");
                self.end_session(state, true)?;
                Ok(None)
            }
            None => Ok(None),
            Some(token) => {
                if state.raw_token.as_deref() != Some(token.as_str()) {
                    state.install_token(Some(token.clone()));
                    self.publish(&state);
                }
                Ok(Some(token))
            }
        }
    }

    // ============================================================================
    // Cross-tab synchronisation
    // ============================================================================

    /// Re-derives the session after a storage change made by another tab.
    pub fn handle_storage_event(&self, event: &StorageEvent) -> Result<StorageSync, SessionError> {
        if !event.concerns(self.tokens.key()) {
            return Ok(StorageSync::Ignored);
        }

        let mut state = self.lock();
        match self.tokens.get_token()? {
            None if state.raw_token.is_some() => {
                tracing::info!(source = %event.source, "Token removed by another tab, logging out");
                self.end_session(state, true)?;
                Ok(StorageSync::LoggedOut)
            }
            None => Ok(StorageSync::Unchanged),
            Some(token) if state.raw_token.as_deref() == Some(token.as_str()) => {
                Ok(StorageSync::Unchanged)
            }
            Some(token) => {
                tracing::info!(source = %event.source, "Token replaced by another tab");
                state.install_token(Some(token));
                self.publish(&state);
                Ok(StorageSync::TokenChanged)
            }
        }
    }

    /// Applies storage changes from other tabs on a background task, reloading
    /// the profile when a new token appears.
    ///
    /// The task holds only a weak reference and stops once the session is
    /// dropped or the storage goes away.
    pub fn spawn_storage_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut subscription = self.tokens.storage().subscribe();
        let weak = Arc::downgrade(self);

        tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                let Some(session) = weak.upgrade() else {
                    break;
                };
                match session.handle_storage_event(&event) {
                    Ok(StorageSync::TokenChanged) => {
                        if let Err(e) = session.ensure_profile_loaded().await {
                            tracing::warn!(error = %e, "Profile reload after token change failed");
                        }
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "Failed to apply storage change"),
                }
            }
            tracing::debug!("Storage listener stopped");
        })
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// Current derived state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    /// Receives a new snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.published.subscribe()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().raw_token.is_some()
    }

    /// Profile username, else the token subject.
    pub fn username(&self) -> Option<String> {
        self.snapshot().username
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.lock().profile.clone()
    }

    pub fn claims(&self) -> Option<Claims> {
        self.lock().claims.clone()
    }

    /// True iff an expiry is known and `now >= expiry - grace_seconds`.
    pub fn is_expired(&self, grace_seconds: i64) -> bool {
        let now = self.tokens.clock().now_epoch_seconds();
        self.snapshot().is_expired_at(now, grace_seconds)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.snapshot().has_role(role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.snapshot().has_any_role(roles)
    }

    pub fn has_all_roles<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.snapshot().has_all_roles(roles)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.snapshot().has_permission(permission)
    }

    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        self.snapshot().has_any_permission(permissions)
    }

    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        self.snapshot().has_all_permissions(permissions)
    }

    pub fn is_admin(&self) -> bool {
        self.has_any_role(self.settings.admin_roles.as_slice())
    }

    /// Holds a developer role and is not an administrator.
    pub fn is_developer(&self) -> bool {
        let snapshot = self.snapshot();
        snapshot.has_any_role(self.settings.developer_roles.as_slice())
            && !snapshot.has_any_role(self.settings.admin_roles.as_slice())
    }

    /// The current user as seen by the ticket rules.
    pub fn actor(&self) -> Actor {
        let snapshot = self.snapshot();
        match snapshot.username {
            Some(ref username) => Actor::new(
                username.clone(),
                snapshot.has_any_role(self.settings.admin_roles.as_slice()),
                snapshot.has_any_role(self.settings.developer_roles.as_slice()),
            ),
            None => Actor::anonymous(),
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }
}

fn rejected(username: &str, err: anyhow::Error) -> SessionError {
    tracing::warn!(username, error = %err, "Authentication rejected");
    SessionError::Authentication(err.to_string())
}

/// Resets an interrupted fetch so waiting callers can retry.
struct LoadGuard<'a> {
    session: &'a SessionContext,
    generation: u64,
    armed: bool,
}

impl LoadGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.session.lock();
        if state.generation == self.generation && state.load == ProfileLoad::Loading {
            tracing::debug!(generation = self.generation, "Profile load cancelled");
            state.load = ProfileLoad::Idle;
            self.session.publish(&state);
        }
    }
}
