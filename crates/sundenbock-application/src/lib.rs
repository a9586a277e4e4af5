//! Application layer for Sundenbock.
//!
//! This crate coordinates the domain and infrastructure layers: the
//! [`SessionContext`] owns the signed-in session, and the resource services
//! load tickets, projects, comments and users through their clients and map
//! them into the domain model.

pub mod comments_service;
pub mod logging;
pub mod projects_service;
pub mod session;
pub mod tickets_service;
pub mod users_service;

pub use comments_service::CommentsService;
pub use logging::init_logging;
pub use projects_service::ProjectsService;
pub use session::{SessionContext, SessionError, SessionPhase, SessionSnapshot, StorageSync};
pub use tickets_service::TicketsService;
pub use users_service::UsersService;
