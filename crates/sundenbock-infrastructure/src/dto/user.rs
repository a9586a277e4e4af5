//! User DTOs and their mapping spec.

use serde::{Deserialize, Serialize};

use sundenbock_core::mapping::{MappingError, MappingSpec};
use sundenbock_core::user::UserProfile;

/// `GET /users/{username}/details` and `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl From<&UserProfile> for UserDetailDto {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            enabled: profile.enabled,
            created_at: None,
            updated_at: None,
            roles: profile.roles.clone(),
            permissions: profile.permissions.clone(),
        }
    }
}

/// Creates the `UserDetailDto` → [`UserProfile`] spec. Audit timestamps are
/// not part of the profile.
pub fn create_user_spec() -> Result<MappingSpec<UserProfile>, MappingError> {
    MappingSpec::builder()
        .keep_all(&[
            "id",
            "username",
            "email",
            "firstName",
            "lastName",
            "enabled",
            "roles",
            "permissions",
        ])
        .build()
}
