//! Comment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::MappedRecord;

/// Author or last editor of a comment. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub id: Option<u64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl MappedRecord for CommentAuthor {
    const TYPE_NAME: &'static str = "CommentAuthor";
    const FIELDS: &'static [&'static str] = &["id", "username", "firstName", "lastName"];
}

/// A comment on a ticket, with its replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketComment {
    pub id: Option<u64>,
    pub ticket_id: u64,
    pub parent_comment_id: Option<u64>,
    pub comment_text: String,
    pub likes: Option<u32>,
    pub dislikes: Option<u32>,
    #[serde(default)]
    pub child_comments: Vec<TicketComment>,
    pub created_date: Option<DateTime<Utc>>,
    pub last_modified_date: Option<DateTime<Utc>>,
    pub created_by: Option<CommentAuthor>,
    pub last_modified_by: Option<CommentAuthor>,
}

impl MappedRecord for TicketComment {
    const TYPE_NAME: &'static str = "TicketComment";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "ticketId",
        "parentCommentId",
        "commentText",
        "likes",
        "dislikes",
        "childComments",
        "createdDate",
        "lastModifiedDate",
        "createdBy",
        "lastModifiedBy",
    ];
}

impl TicketComment {
    /// Finds a comment by id anywhere in this thread.
    pub fn find(&self, comment_id: u64) -> Option<&TicketComment> {
        if self.id == Some(comment_id) {
            return Some(self);
        }
        self.child_comments.iter().find_map(|c| c.find(comment_id))
    }

    /// Finds a comment by id anywhere in this thread, mutably.
    pub fn find_mut(&mut self, comment_id: u64) -> Option<&mut TicketComment> {
        if self.id == Some(comment_id) {
            return Some(self);
        }
        self.child_comments
            .iter_mut()
            .find_map(|c| c.find_mut(comment_id))
    }

    /// Number of comments in this thread, including this one.
    pub fn thread_len(&self) -> usize {
        1 + self
            .child_comments
            .iter()
            .map(TicketComment::thread_len)
            .sum::<usize>()
    }
}

/// A comment to be posted. `parent_comment_id` makes it a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub ticket_id: u64,
    pub parent_comment_id: Option<u64>,
    pub comment_text: String,
}

impl NewComment {
    pub fn new(ticket_id: u64, comment_text: impl Into<String>) -> Self {
        Self {
            ticket_id,
            parent_comment_id: None,
            comment_text: comment_text.into(),
        }
    }

    pub fn reply_to(mut self, parent_comment_id: u64) -> Self {
        self.parent_comment_id = Some(parent_comment_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: u64, children: Vec<TicketComment>) -> TicketComment {
        TicketComment {
            id: Some(id),
            ticket_id: 1,
            parent_comment_id: None,
            comment_text: format!("comment {id}"),
            likes: None,
            dislikes: None,
            child_comments: children,
            created_date: None,
            last_modified_date: None,
            created_by: None,
            last_modified_by: None,
        }
    }

    #[test]
    fn test_find_in_thread() {
        let mut thread = comment(1, vec![comment(2, vec![comment(3, vec![])]), comment(4, vec![])]);

        assert_eq!(thread.thread_len(), 4);
        assert_eq!(thread.find(3).map(|c| c.comment_text.as_str()), Some("comment 3"));
        assert!(thread.find(9).is_none());

        thread.find_mut(4).unwrap().likes = Some(2);
        assert_eq!(thread.find(4).unwrap().likes, Some(2));
    }

    #[test]
    fn test_fields_match_serialized_keys() {
        let json = serde_json::to_value(comment(1, vec![])).unwrap();
        let keys = json.as_object().unwrap();
        assert_eq!(keys.len(), TicketComment::FIELDS.len());
        for field in TicketComment::FIELDS {
            assert!(keys.contains_key(*field), "{field}");
        }
    }
}
