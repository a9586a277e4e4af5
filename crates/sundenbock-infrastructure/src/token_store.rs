//! Token persistence across the session and durable scopes.
//!
//! The token record lives under a single key in exactly one scope at a time:
//! durable when the user asked to be remembered, session-only otherwise.
//! Reading an expired record removes it before anything can use it.

use std::sync::Arc;

use sundenbock_core::auth::{Claims, StoredToken};
use sundenbock_core::clock::Clock;
use sundenbock_core::config::AuthSettings;
use sundenbock_core::storage::{KeyValueStorage, StorageScope};
use sundenbock_core::Result;

use crate::jwt;

pub const DEFAULT_TOKEN_KEY: &str = "jwt_token";

/// Single source of truth for the current bearer token.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    key: String,
    grace_seconds: i64,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            key: DEFAULT_TOKEN_KEY.to_string(),
            grace_seconds: 0,
        }
    }

    /// Creates a store using the configured key and expiry grace.
    pub fn from_settings(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        settings: &AuthSettings,
    ) -> Self {
        Self::new(storage, clock)
            .with_key(settings.token_key.clone())
            .with_grace_seconds(settings.expiry_grace_seconds)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_grace_seconds(mut self, grace_seconds: i64) -> Self {
        self.grace_seconds = grace_seconds.max(0);
        self
    }

    /// Storage key of the token record.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Stores `token` in the durable scope if `remember`, else the session
    /// scope, and removes it from the other scope.
    ///
    /// The expiry is read from the token when possible; an undecodable token is
    /// stored without expiry.
    pub fn set_token(&self, token: &str, remember: bool) -> Result<()> {
        let record = StoredToken {
            token: token.to_string(),
            expiry_epoch_seconds: jwt::decode_expiry(token),
        };
        let serialized = serde_json::to_string(&record)?;

        let scope = if remember {
            StorageScope::Durable
        } else {
            StorageScope::Session
        };
        self.storage.set(scope, &self.key, &serialized)?;
        self.storage.remove(scope.other(), &self.key)?;

        tracing::debug!(
            ?scope,
            exp = ?record.expiry_epoch_seconds,
            "Token stored"
        );
        Ok(())
    }

    /// Returns the current token, or `None` if there is none or it expired.
    ///
    /// An expired record is cleared from both scopes.
    pub fn get_token(&self) -> Result<Option<String>> {
        let Some(record) = self.stored()? else {
            return Ok(None);
        };

        if record.is_expired_at(self.clock.now_epoch_seconds(), self.grace_seconds) {
            tracing::info!(exp = ?record.expiry_epoch_seconds, "Stored token expired, clearing");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(record.token))
    }

    /// True iff no valid token is stored.
    pub fn is_unauthenticated(&self) -> Result<bool> {
        Ok(self.get_token()?.is_none())
    }

    /// Removes the token from both scopes.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(StorageScope::Session, &self.key)?;
        self.storage.remove(StorageScope::Durable, &self.key)?;
        tracing::debug!("Token cleared");
        Ok(())
    }

    /// Decoded claims of the current token.
    pub fn get_payload(&self) -> Result<Option<Claims>> {
        Ok(self.get_token()?.as_deref().and_then(jwt::decode_claims))
    }

    /// Reads the raw record without expiry handling.
    ///
    /// The session scope wins over the durable scope. A value that is not a
    /// JSON record is a token written by older clients and is read as such.
    pub fn stored(&self) -> Result<Option<StoredToken>> {
        let raw = match self.storage.get(StorageScope::Session, &self.key)? {
            Some(value) => Some(value),
            None => self.storage.get(StorageScope::Durable, &self.key)?,
        };
        Ok(raw.as_deref().and_then(parse_record))
    }
}

fn parse_record(raw: &str) -> Option<StoredToken> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(record) = serde_json::from_str::<StoredToken>(trimmed) {
        return Some(record);
    }
    Some(StoredToken {
        token: trimmed.to_string(),
        expiry_epoch_seconds: jwt::decode_expiry(trimmed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::BrowserOrigin;
    use serde_json::json;
    use sundenbock_core::clock::ManualClock;

    fn store() -> (TokenStore, Arc<ManualClock>, BrowserOrigin) {
        let origin = BrowserOrigin::new();
        let clock = Arc::new(ManualClock::new(1_000));
        let store = TokenStore::new(Arc::new(origin.open_tab()), clock.clone());
        (store, clock, origin)
    }

    #[test]
    fn test_remember_selects_scope_exclusively() {
        let (store, _, origin) = store();
        let token = jwt::encode_unsigned(&json!({ "sub": "alice" }));

        store.set_token(&token, false).unwrap();
        assert!(origin.durable_value("jwt_token").is_none());
        assert_eq!(store.get_token().unwrap().as_deref(), Some(token.as_str()));

        store.set_token(&token, true).unwrap();
        assert!(origin.durable_value("jwt_token").is_some());
        assert!(
            store
                .storage()
                .get(StorageScope::Session, "jwt_token")
                .unwrap()
                .is_none()
        );

        store.set_token(&token, false).unwrap();
        assert!(origin.durable_value("jwt_token").is_none());
    }

    #[test]
    fn test_record_format() {
        let (store, _, origin) = store();
        let token = jwt::encode_unsigned(&json!({ "exp": 1_060 }));
        store.set_token(&token, true).unwrap();

        let raw = origin.durable_value("jwt_token").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!({ "token": token, "exp": 1_060 }));
    }

    #[test]
    fn test_expired_read_clears_storage() {
        let (store, clock, origin) = store();
        let token = jwt::encode_unsigned(&json!({ "sub": "alice", "exp": 1_060 }));
        store.set_token(&token, true).unwrap();

        assert_eq!(store.get_token().unwrap().as_deref(), Some(token.as_str()));
        assert!(!store.is_unauthenticated().unwrap());

        clock.advance(61);
        assert_eq!(store.get_token().unwrap(), None);
        assert!(origin.durable_value("jwt_token").is_none());
        assert!(store.is_unauthenticated().unwrap());
    }

    #[test]
    fn test_unusual_claims_still_expire() {
        let payloads = [
            json!({ "sub": 42, "exp": 1_060 }),
            json!({ "sub": "alice", "exp": 1_060, "roles": null }),
            json!({ "sub": "alice", "exp": 1_060, "roles": [{ "authority": "ROLE_USER" }] }),
        ];
        for payload in payloads {
            let (store, clock, _) = store();
            store.set_token(&jwt::encode_unsigned(&payload), true).unwrap();
            assert!(store.get_token().unwrap().is_some(), "{payload}");

            clock.advance(120);
            assert_eq!(store.get_token().unwrap(), None, "{payload}");
        }
    }

    #[test]
    fn test_undecodable_token_never_expires() {
        let (store, clock, _) = store();
        store.set_token("opaque", true).unwrap();

        clock.advance(10_000_000);
        assert_eq!(store.get_token().unwrap().as_deref(), Some("opaque"));
        assert!(store.get_payload().unwrap().is_none());
    }

    #[test]
    fn test_legacy_raw_token_is_read() {
        let (store, clock, _) = store();
        let token = jwt::encode_unsigned(&json!({ "sub": "bob", "exp": 1_010 }));
        store
            .storage()
            .set(StorageScope::Durable, "jwt_token", &token)
            .unwrap();

        let claims = store.get_payload().unwrap().unwrap();
        assert_eq!(claims.sub.as_deref(), Some("bob"));

        clock.advance(10);
        assert_eq!(store.get_token().unwrap(), None);
    }

    #[test]
    fn test_session_scope_wins() {
        let (store, _, _) = store();
        let storage = store.storage().clone();
        storage
            .set(StorageScope::Durable, "jwt_token", r#"{"token":"durable"}"#)
            .unwrap();
        storage
            .set(StorageScope::Session, "jwt_token", r#"{"token":"session"}"#)
            .unwrap();

        assert_eq!(store.get_token().unwrap().as_deref(), Some("session"));
    }

    #[test]
    fn test_configured_key_and_grace() {
        let origin = BrowserOrigin::new();
        let clock = Arc::new(ManualClock::new(1_000));
        let settings = AuthSettings {
            token_key: "auth".to_string(),
            expiry_grace_seconds: 30,
            ..AuthSettings::default()
        };
        let store = TokenStore::from_settings(Arc::new(origin.open_tab()), clock, &settings);

        let token = jwt::encode_unsigned(&json!({ "exp": 1_020 }));
        store.set_token(&token, true).unwrap();
        assert!(origin.durable_value("auth").is_some());

        // Within the grace window the token already counts as expired.
        assert_eq!(store.get_token().unwrap(), None);
        assert!(origin.durable_value("auth").is_none());
    }

    #[test]
    fn test_clear_removes_both_scopes() {
        let (store, _, origin) = store();
        store.set_token("a", true).unwrap();
        store
            .storage()
            .set(StorageScope::Session, "jwt_token", "b")
            .unwrap();

        store.clear().unwrap();
        assert!(store.stored().unwrap().is_none());
        assert!(origin.durable_value("jwt_token").is_none());
    }
}
