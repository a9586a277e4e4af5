//! Resource client contracts.
//!
//! One trait per REST resource, speaking DTOs. The HTTP implementations are
//! provided by the host; facades in the application crate map the results.

use async_trait::async_trait;

use sundenbock_core::paging::{Page, PageQuery};

use crate::dto::{
    CommentDto, CreateCommentDto, CreateProjectDto, CreateTicketDto, ProjectDto, TicketDto,
    UpdateTicketDto, UserDetailDto,
};

#[async_trait]
pub trait TicketsClient: Send + Sync {
    /// `GET /tickets`
    async fn list(&self, query: &PageQuery) -> anyhow::Result<Page<TicketDto>>;

    /// `GET /tickets/{id}`
    async fn get(&self, id: u64) -> anyhow::Result<TicketDto>;

    /// `POST /tickets`
    async fn create(&self, body: &CreateTicketDto) -> anyhow::Result<TicketDto>;

    /// `PUT /tickets/{id}`
    async fn update(&self, id: u64, body: &UpdateTicketDto) -> anyhow::Result<TicketDto>;
}

#[async_trait]
pub trait ProjectsClient: Send + Sync {
    /// `GET /projects`
    async fn list(&self, query: &PageQuery) -> anyhow::Result<Page<ProjectDto>>;

    /// `GET /projects/{id}`
    async fn get(&self, id: u64) -> anyhow::Result<ProjectDto>;

    /// `POST /projects`
    async fn create(&self, body: &CreateProjectDto) -> anyhow::Result<ProjectDto>;
}

#[async_trait]
pub trait CommentsClient: Send + Sync {
    /// `GET /tickets/{ticket_id}/comments`
    async fn list_by_ticket(
        &self,
        ticket_id: u64,
        query: &PageQuery,
    ) -> anyhow::Result<Page<CommentDto>>;

    /// `POST /tickets/{ticket_id}/comments/create`, answering the updated ticket.
    async fn create_for_ticket(
        &self,
        ticket_id: u64,
        body: &CreateCommentDto,
    ) -> anyhow::Result<TicketDto>;

    /// `PUT /tickets/{ticket_id}/comments/{comment_id}/update`
    async fn update_comment(
        &self,
        ticket_id: u64,
        comment_id: u64,
        body: &CommentDto,
    ) -> anyhow::Result<CommentDto>;
}

#[async_trait]
pub trait UsersClient: Send + Sync {
    /// `GET /users`
    async fn list_all(&self) -> anyhow::Result<Vec<UserDetailDto>>;

    /// `GET /users/{username}/details`
    async fn get_details(&self, username: &str) -> anyhow::Result<UserDetailDto>;

    /// `PUT /users/{username}/update`. The backend expects the complete record.
    async fn update_by_username(
        &self,
        username: &str,
        body: &UserDetailDto,
    ) -> anyhow::Result<UserDetailDto>;
}
