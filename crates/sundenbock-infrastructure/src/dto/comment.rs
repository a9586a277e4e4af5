//! Comment DTOs and their mapping spec.

use serde::{Deserialize, Serialize};

use sundenbock_core::comment::{CommentAuthor, NewComment, TicketComment};
use sundenbock_core::mapping::{FieldRule, MappingError, MappingSpec, convert};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// A comment as sent by the backend, replies included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub ticket_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<u64>,
    pub comment_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_comments: Option<Vec<CommentDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CommentUserDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<CommentUserDto>,
}

/// Body of `POST /tickets/{id}/comments/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentDto {
    pub ticket_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<u64>,
    pub comment_text: String,
}

impl From<&NewComment> for CreateCommentDto {
    fn from(comment: &NewComment) -> Self {
        Self {
            ticket_id: comment.ticket_id,
            parent_comment_id: comment.parent_comment_id,
            comment_text: comment.comment_text.clone(),
        }
    }
}

impl CommentDto {
    /// Builds the update body for a comment with new vote counters.
    ///
    /// Replies are not sent back; the backend keeps the thread structure.
    pub fn with_votes(comment: &TicketComment, likes: u32, dislikes: u32) -> Self {
        Self {
            id: comment.id,
            ticket_id: comment.ticket_id,
            parent_comment_id: comment.parent_comment_id,
            comment_text: comment.comment_text.clone(),
            likes: Some(likes),
            dislikes: Some(dislikes),
            child_comments: None,
            created_date: None,
            last_modified_date: None,
            created_by: None,
            last_modified_by: None,
        }
    }
}

fn create_author_spec() -> Result<MappingSpec<CommentAuthor>, MappingError> {
    MappingSpec::builder()
        .keep_all(&["id", "username", "firstName", "lastName"])
        .build()
}

/// Creates the `CommentDto` → [`TicketComment`] spec.
///
/// Replies are mapped with the same spec at any depth; a comment without
/// replies maps to an empty list.
pub fn create_comment_spec() -> Result<MappingSpec<TicketComment>, MappingError> {
    let author = create_author_spec()?;

    MappingSpec::builder()
        .keep_all(&[
            "id",
            "ticketId",
            "parentCommentId",
            "commentText",
            "likes",
            "dislikes",
        ])
        .rule("createdDate", FieldRule::map(convert::parse_optional_date))
        .rule("lastModifiedDate", FieldRule::map(convert::parse_optional_date))
        .rule("createdBy", FieldRule::nested(&author))
        .rule("lastModifiedBy", FieldRule::nested(&author))
        .rule("childComments", FieldRule::recursive_array())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sundenbock_core::mapping::transform;

    #[test]
    fn test_maps_thread() {
        let dto: CommentDto = serde_json::from_value(json!({
            "id": 1,
            "ticketId": 9,
            "commentText": "Root",
            "likes": 2,
            "createdDate": "2024-03-01T09:00:00Z",
            "createdBy": { "username": "alice" },
            "childComments": [
                {
                    "id": 2,
                    "ticketId": 9,
                    "parentCommentId": 1,
                    "commentText": "Reply",
                    "childComments": [
                        { "id": 3, "ticketId": 9, "parentCommentId": 2, "commentText": "Nested" }
                    ]
                }
            ]
        }))
        .unwrap();

        let spec = create_comment_spec().unwrap();
        let comment = transform(&dto, &spec).unwrap();

        assert_eq!(comment.thread_len(), 3);
        assert_eq!(comment.likes, Some(2));
        assert!(comment.created_date.is_some());
        assert_eq!(
            comment.created_by.as_ref().and_then(|a| a.username.as_deref()),
            Some("alice")
        );

        let nested = comment.find(3).unwrap();
        assert_eq!(nested.parent_comment_id, Some(2));
        assert!(nested.child_comments.is_empty());
        assert!(nested.created_by.is_none());
    }

    #[test]
    fn test_vote_update_body() {
        let dto = CommentDto {
            id: Some(4),
            ticket_id: 9,
            parent_comment_id: None,
            comment_text: "Hi".to_string(),
            likes: Some(1),
            dislikes: None,
            child_comments: Some(Vec::new()),
            created_date: None,
            last_modified_date: None,
            created_by: None,
            last_modified_by: None,
        };
        let comment = transform(&dto, &create_comment_spec().unwrap()).unwrap();

        let body = CommentDto::with_votes(&comment, 2, 0);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "id": 4, "ticketId": 9, "commentText": "Hi", "likes": 2, "dislikes": 0 })
        );
    }
}
