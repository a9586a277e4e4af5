//! Project domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::MappedRecord;

/// Compact reference to a user, as embedded in audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: u64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl MappedRecord for UserRef {
    const TYPE_NAME: &'static str = "UserRef";
    const FIELDS: &'static [&'static str] = &["id", "username", "firstName", "lastName"];
}

/// A project groups tickets under a common abbreviation (e.g. `SB`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub abbreviation: String,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub created_by: Option<UserRef>,
    pub last_modified_by: Option<UserRef>,
}

impl MappedRecord for Project {
    const TYPE_NAME: &'static str = "Project";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "abbreviation",
        "createdDate",
        "lastModifiedDate",
        "createdBy",
        "lastModifiedBy",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fields_match_serialized_keys() {
        let at = Utc.with_ymd_and_hms(2024, 2, 2, 8, 0, 0).unwrap();
        let project = Project {
            id: 1,
            title: "Sundenbock".to_string(),
            description: "Tracker".to_string(),
            abbreviation: "SB".to_string(),
            created_date: at,
            last_modified_date: at,
            created_by: None,
            last_modified_by: None,
        };

        let json = serde_json::to_value(&project).unwrap();
        let keys = json.as_object().unwrap();
        assert_eq!(keys.len(), Project::FIELDS.len());
        for field in Project::FIELDS {
            assert!(keys.contains_key(*field), "{field}");
        }
    }
}
