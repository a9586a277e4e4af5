//! Ticket domain module.
//!
//! This module contains the ticket domain models and the client-side editing
//! rules that decide which controls a user is offered.
//!
//! # Module Structure
//!
//! - `model`: Core ticket domain models (`Ticket`, `TicketStatus`, etc.)
//! - `permissions`: Role and relationship based editing rules (`TicketPermissions`)
//!
//! The server stays authoritative for every status transition; these rules
//! only shape what the UI offers.

mod model;
mod permissions;

// Re-export public API
pub use model::{Ticket, TicketProjectRef, TicketResponsible, TicketStatus};
pub use permissions::{Actor, SelfAssignment, TicketPermissions};
