//! UserProfile domain model.
//!
//! Represents the authenticated user's account details together with the
//! roles and permissions granted by the server.

use serde::{Deserialize, Serialize};

use crate::mapping::MappedRecord;

/// User profile domain model.
///
/// Returned by the profile collaborator (`GET /auth/me`) and by the user
/// details endpoint. `roles` and `permissions` are ordered and duplicate-free
/// as delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Option<u64>,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl MappedRecord for UserProfile {
    const TYPE_NAME: &'static str = "UserProfile";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "username",
        "email",
        "firstName",
        "lastName",
        "enabled",
        "roles",
        "permissions",
    ];
}

impl UserProfile {
    /// Creates a profile with only a username and grants.
    pub fn new(
        username: impl Into<String>,
        roles: impl IntoIterator<Item = impl Into<String>>,
        permissions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            first_name: None,
            last_name: None,
            enabled: true,
            roles: roles.into_iter().map(Into::into).collect(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Display name: "First Last" when both are known, otherwise the username.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{first} {last}")
            }
            _ => self.username.clone(),
        }
    }
}

/// Partial update of one's own profile.
///
/// `None` keeps the current value. The server expects a complete record, so a
/// patch is always merged onto freshly loaded details before it is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Option<Vec<String>>,
    pub permissions: Option<Vec<String>>,
}

impl UserPatch {
    /// Applies the patch to `current`, returning the full record to send.
    pub fn merge_onto(self, current: UserProfile) -> UserProfile {
        UserProfile {
            email: self.email.or(current.email),
            first_name: self.first_name.or(current.first_name),
            last_name: self.last_name.or(current.last_name),
            roles: self.roles.unwrap_or(current.roles),
            permissions: self.permissions.unwrap_or(current.permissions),
            ..current
        }
    }
}

/// Returns true if `granted` contains at least one of `wanted`.
pub fn contains_any<S: AsRef<str>>(granted: &[String], wanted: &[S]) -> bool {
    wanted
        .iter()
        .any(|w| granted.iter().any(|g| g == w.as_ref()))
}

/// Returns true if `granted` contains every entry of `wanted`.
pub fn contains_all<S: AsRef<str>>(granted: &[String], wanted: &[S]) -> bool {
    wanted
        .iter()
        .all(|w| granted.iter().any(|g| g == w.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_with_defaults() {
        let profile: UserProfile =
            serde_json::from_str(r#"{ "username": "alice" }"#).unwrap();
        assert!(profile.enabled);
        assert!(profile.roles.is_empty());
        assert!(profile.permissions.is_empty());
    }

    #[test]
    fn test_fields_match_serialized_keys() {
        let profile = UserProfile::new("alice", ["ADMIN"], ["TICKET_READ"]);
        let json = serde_json::to_value(&profile).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        for key in &keys {
            assert!(UserProfile::FIELDS.contains(&key.as_str()), "{key}");
        }
        assert_eq!(keys.len(), UserProfile::FIELDS.len());
    }

    #[test]
    fn test_display_name() {
        let mut profile = UserProfile::new("alice", Vec::<String>::new(), Vec::<String>::new());
        assert_eq!(profile.display_name(), "alice");
        profile.first_name = Some("Alice".to_string());
        profile.last_name = Some("Smith".to_string());
        assert_eq!(profile.display_name(), "Alice Smith");
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let mut current = UserProfile::new("alice", ["DEVELOPER"], ["TICKET_READ"]);
        current.email = Some("alice@old.example".to_string());
        current.first_name = Some("Alice".to_string());

        let patch = UserPatch {
            email: Some("alice@new.example".to_string()),
            last_name: Some("Smith".to_string()),
            ..UserPatch::default()
        };
        let merged = patch.merge_onto(current);

        assert_eq!(merged.username, "alice");
        assert_eq!(merged.email.as_deref(), Some("alice@new.example"));
        assert_eq!(merged.first_name.as_deref(), Some("Alice"));
        assert_eq!(merged.last_name.as_deref(), Some("Smith"));
        assert_eq!(merged.roles, vec!["DEVELOPER".to_string()]);
        assert_eq!(merged.permissions, vec!["TICKET_READ".to_string()]);
    }

    #[test]
    fn test_any_and_all() {
        let granted = vec!["ADMIN".to_string()];
        assert!(contains_any(&granted, &["ADMIN", "USER"]));
        assert!(!contains_all(&granted, &["ADMIN", "USER"]));
        assert!(contains_all(&granted, &[] as &[&str]));
        assert!(!contains_any(&granted, &[] as &[&str]));
    }
}
