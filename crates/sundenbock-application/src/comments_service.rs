//! Comments Service
//!
//! Lists and creates ticket comments and applies like/dislike votes.
//!
//! Votes are optimistic: the [`VoteTracker`] updates its local state first and
//! the new counters are then written back with the comment. The counters sent
//! are derived from the comment as last loaded, so concurrent votes by other
//! users are overwritten (last write wins).

use std::sync::Arc;

use sundenbock_core::Result;
use sundenbock_core::comment::{NewComment, TicketComment, VoteTracker, VoteType};
use sundenbock_core::mapping::{MappingSpec, transform, transform_collection};
use sundenbock_core::paging::{Page, PageQuery};
use sundenbock_core::ticket::Ticket;
use sundenbock_infrastructure::client::CommentsClient;
use sundenbock_infrastructure::dto::{
    CommentDto, CreateCommentDto, create_comment_spec, create_ticket_spec,
};

pub struct CommentsService {
    client: Arc<dyn CommentsClient>,
    comment_spec: MappingSpec<TicketComment>,
    ticket_spec: MappingSpec<Ticket>,
    votes: VoteTracker,
    default_page_size: u32,
}

impl CommentsService {
    pub fn new(client: Arc<dyn CommentsClient>, default_page_size: u32) -> Result<Self> {
        Ok(Self {
            client,
            comment_spec: create_comment_spec()?,
            ticket_spec: create_ticket_spec()?,
            votes: VoteTracker::new(),
            default_page_size,
        })
    }

    /// Top-level comments of a ticket, each with its full reply tree.
    pub async fn list_by_ticket(&self, ticket_id: u64, query: PageQuery) -> Result<Page<TicketComment>> {
        let query = query.with_defaults(self.default_page_size);
        let page = self.client.list_by_ticket(ticket_id, &query).await?;
        Ok(transform_collection(&page, &self.comment_spec)?)
    }

    /// Posts a comment or reply. The backend answers with the updated ticket.
    pub async fn create(&self, comment: &NewComment) -> Result<Ticket> {
        let body = CreateCommentDto::from(comment);
        let dto = self.client.create_for_ticket(comment.ticket_id, &body).await?;
        let ticket = transform(&dto, &self.ticket_spec)?;
        tracing::info!(
            ticket_id = comment.ticket_id,
            parent_comment_id = ?comment.parent_comment_id,
            "Comment created"
        );
        Ok(ticket)
    }

    /// Toggles this client's vote on `comment` and writes the counters back.
    ///
    /// Returns `Ok(None)` for comments without an id. If the write-back fails
    /// the local vote is restored and the error returned; callers reload the
    /// ticket's comments to show the server's counters again.
    pub async fn toggle_vote(
        &self,
        comment: &TicketComment,
        vote: VoteType,
    ) -> Result<Option<TicketComment>> {
        let Some(comment_id) = comment.id else {
            return Ok(None);
        };
        let previous = self.votes.current(comment_id);
        let Some(change) = self.votes.toggle(comment, vote) else {
            return Ok(None);
        };

        let body = CommentDto::with_votes(comment, change.likes, change.dislikes);
        match self
            .client
            .update_comment(comment.ticket_id, comment_id, &body)
            .await
        {
            Ok(dto) => Ok(Some(transform(&dto, &self.comment_spec)?)),
            Err(e) => {
                self.votes.revert(comment_id, previous);
                tracing::warn!(comment_id, "Vote write-back failed: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn is_voted(&self, comment: &TicketComment, vote: VoteType) -> bool {
        self.votes.is_voted(comment.id, vote)
    }

    /// Forgets every local vote.
    pub fn clear_votes(&self) {
        self.votes.clear();
    }
}
