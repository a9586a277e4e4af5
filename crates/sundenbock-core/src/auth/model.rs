//! Authentication wire models and token claims.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request sent during login.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthenticationRequest {
    pub username: String,
    pub password: String,
}

impl AuthenticationRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthenticationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request for user registration.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response returned by the backend after successful authentication.
///
/// Older backend builds answer `{ "token": ... }`; both spellings are accepted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Seconds until expiration, as a client convenience.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AuthenticationResponse {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: Some("Bearer".to_string()),
            expires_in: None,
        }
    }
}

impl fmt::Debug for AuthenticationResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Decoded payload of a bearer token. Never verified on the client.
///
/// Decoding is lenient per field: a claim of an unexpected shape reads as
/// absent instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Claims {
    /// Subject (username).
    pub sub: Option<String>,
    /// Expiration, epoch seconds.
    pub exp: Option<i64>,
    /// Issued at, epoch seconds.
    pub iat: Option<i64>,
    pub iss: Option<String>,
    pub email: Option<String>,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    /// Any further custom claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for Claims {
    fn from(mut payload: Map<String, Value>) -> Self {
        let mut take = |key: &str| payload.remove(key).unwrap_or(Value::Null);
        let sub = text(&take("sub"));
        let exp = epoch_seconds(&take("exp"));
        let iat = epoch_seconds(&take("iat"));
        let iss = text(&take("iss"));
        let email = text(&take("email"));
        let roles = authorities(&take("roles"));
        let permissions = authorities(&take("permissions"));
        Self {
            sub,
            exp,
            iat,
            iss,
            email,
            roles,
            permissions,
            extra: payload,
        }
    }
}

/// Reads integral or fractional epoch seconds, floored.
pub fn epoch_seconds(value: &Value) -> Option<i64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if let Some(exact) = value.as_i64() {
        return Some(exact);
    }
    seconds.is_finite().then(|| seconds.floor() as i64)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Role or permission names from a list of strings, a list of
/// `{"authority": ...}` style objects, or a single delimited string.
fn authorities(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => ["authority", "name", "role"]
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(Value::as_str))
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
        Value::String(s) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Persisted token record: `{ "token": ..., "exp"?: ... }`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiry_epoch_seconds: Option<i64>,
}

impl StoredToken {
    /// Returns true if the expiry is known and `now >= expiry - grace`.
    pub fn is_expired_at(&self, now_epoch_seconds: i64, grace_seconds: i64) -> bool {
        match self.expiry_epoch_seconds {
            Some(exp) => now_epoch_seconds >= exp.saturating_sub(grace_seconds),
            None => false,
        }
    }
}

impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredToken")
            .field("token", &"<redacted>")
            .field("exp", &self.expiry_epoch_seconds)
            .finish()
    }
}
