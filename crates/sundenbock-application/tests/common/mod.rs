#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::json;

use sundenbock_application::SessionContext;
use sundenbock_core::auth::{
    AuthClient, AuthenticationRequest, AuthenticationResponse, Navigator, ProfileClient,
    RegistrationRequest,
};
use sundenbock_core::clock::ManualClock;
use sundenbock_core::config::AuthSettings;
use sundenbock_core::user::UserProfile;
use sundenbock_infrastructure::{BrowserTab, TokenStore, jwt};

pub const NOW: i64 = 1_700_000_000;

/// Unsigned token for `username` expiring `ttl` seconds after [`NOW`].
pub fn token_for(username: &str, roles: &[&str], ttl: i64) -> String {
    jwt::encode_unsigned(&json!({
        "sub": username,
        "exp": NOW + ttl,
        "roles": roles,
    }))
}

/// Accepts any password except "wrong" and hands out a one hour token.
pub struct MockAuthClient;

#[async_trait]
impl AuthClient for MockAuthClient {
    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> anyhow::Result<AuthenticationResponse> {
        if request.password == "wrong" {
            return Err(anyhow!("401 Unauthorized"));
        }
        Ok(AuthenticationResponse::bearer(token_for(
            &request.username,
            &[],
            3_600,
        )))
    }

    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> anyhow::Result<AuthenticationResponse> {
        Ok(AuthenticationResponse::bearer(token_for(
            &request.username,
            &[],
            3_600,
        )))
    }
}

pub struct MockProfileClient {
    profile: Mutex<UserProfile>,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockProfileClient {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            profile: Mutex::new(profile),
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn set_profile(&self, profile: UserProfile) {
        *self.profile.lock().unwrap() = profile;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileClient for MockProfileClient {
    async fn fetch_current_user(&self) -> anyhow::Result<UserProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(anyhow!("500 Internal Server Error"));
        }
        Ok(self.profile.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct CountingNavigator {
    redirects: AtomicUsize,
}

impl CountingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub session: Arc<SessionContext>,
    pub profiles: Arc<MockProfileClient>,
    pub navigator: Arc<CountingNavigator>,
    pub clock: Arc<ManualClock>,
    pub tab: Arc<BrowserTab>,
}

pub fn harness(tab: BrowserTab, clock: Arc<ManualClock>, profiles: MockProfileClient) -> Harness {
    let tab = Arc::new(tab);
    let profiles = Arc::new(profiles);
    let navigator = Arc::new(CountingNavigator::default());
    let tokens = TokenStore::new(tab.clone(), clock.clone());
    let session = SessionContext::new(
        tokens,
        Arc::new(MockAuthClient),
        profiles.clone(),
        navigator.clone(),
        AuthSettings::default(),
    )
    .unwrap();

    Harness {
        session: Arc::new(session),
        profiles,
        navigator,
        clock,
        tab,
    }
}
