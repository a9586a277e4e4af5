//! Data Transfer Objects (DTOs) for the backend REST API.
//!
//! DTOs mirror the wire format exactly: camelCase keys, timestamps as
//! ISO-8601 strings, optional fields left out rather than sent as `null`.
//! Each resource module provides a `create_*_spec()` factory returning the
//! validated mapping spec from its DTO to the domain model.
//!
//! Specs are built once when a facade is constructed and shared afterwards.

mod comment;
mod project;
mod ticket;
mod user;

pub use comment::{CommentDto, CommentUserDto, CreateCommentDto, create_comment_spec};
pub use project::{CreateProjectDto, ProjectDto, UserRefDto, create_project_spec};
pub use ticket::{
    CreateTicketDto, IdRef, TicketDto, TicketProjectDto, TicketResponsiblePersonDto,
    UpdateTicketDto, UsernameRef, create_ticket_spec,
};
pub use user::{UserDetailDto, create_user_spec};
