//! Project DTOs and their mapping spec.

use serde::{Deserialize, Serialize};

use sundenbock_core::mapping::{FieldRule, MappingError, MappingSpec, convert};
use sundenbock_core::project::{Project, UserRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRefDto {
    pub id: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub abbreviation: String,
    pub created_date: String,
    pub last_modified_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRefDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<UserRefDto>,
}

/// Body of `POST /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectDto {
    pub title: String,
    pub description: String,
    pub abbreviation: String,
}

/// Creates the `ProjectDto` → [`Project`] spec.
pub fn create_project_spec() -> Result<MappingSpec<Project>, MappingError> {
    let user_ref: MappingSpec<UserRef> = MappingSpec::builder()
        .keep_all(&["id", "username", "firstName", "lastName"])
        .build()?;

    MappingSpec::builder()
        .keep_all(&["id", "title", "description", "abbreviation"])
        .rule("createdDate", FieldRule::map(convert::parse_date))
        .rule("lastModifiedDate", FieldRule::map(convert::parse_date))
        .rule("createdBy", FieldRule::nested(&user_ref))
        .rule("lastModifiedBy", FieldRule::nested(&user_ref))
        .build()
}
