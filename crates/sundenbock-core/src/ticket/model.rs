//! Ticket domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mapping::MappedRecord;

/// Workflow status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Created,
    Reopened,
    InProgress,
    Resolved,
    Rejected,
    Closed,
}

impl TicketStatus {
    /// Every status, in workflow order.
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::Created,
        TicketStatus::Reopened,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Rejected,
        TicketStatus::Closed,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            TicketStatus::Created => "Created",
            TicketStatus::Reopened => "Reopened",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Rejected => "Rejected",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Wire name, e.g. `IN_PROGRESS`.
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Created => "CREATED",
            TicketStatus::Reopened => "REOPENED",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Rejected => "REJECTED",
            TicketStatus::Closed => "CLOSED",
        }
    }

    /// Open for assignment: nobody is working on it yet.
    pub fn is_open(self) -> bool {
        matches!(self, TicketStatus::Created | TicketStatus::Reopened)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Person responsible for, or author of, a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponsible {
    pub id: u64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl MappedRecord for TicketResponsible {
    const TYPE_NAME: &'static str = "TicketResponsible";
    const FIELDS: &'static [&'static str] = &["id", "username", "firstName", "lastName"];
}

/// Reference to the project a ticket belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketProjectRef {
    pub id: u64,
    pub title: Option<String>,
    pub abbreviation: Option<String>,
}

impl MappedRecord for TicketProjectRef {
    const TYPE_NAME: &'static str = "TicketProjectRef";
    const FIELDS: &'static [&'static str] = &["id", "title", "abbreviation"];
}

/// A ticket as used by the application, with typed timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub project: Option<TicketProjectRef>,
    pub status: TicketStatus,
    pub ticket_key: Option<String>,
    pub responsible_person: Option<TicketResponsible>,
    pub responsible_person_user_name: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub created_by: Option<TicketResponsible>,
    pub last_modified_by: Option<TicketResponsible>,
}

impl MappedRecord for Ticket {
    const TYPE_NAME: &'static str = "Ticket";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "project",
        "status",
        "ticketKey",
        "responsiblePerson",
        "responsiblePersonUserName",
        "createdDate",
        "lastModifiedDate",
        "createdBy",
        "lastModifiedBy",
    ];
}

impl Ticket {
    /// Username of the responsible person, from either representation.
    pub fn responsible_username(&self) -> Option<&str> {
        self.responsible_person
            .as_ref()
            .map(|p| p.username.as_str())
            .or(self.responsible_person_user_name.as_deref())
    }

    /// Username of the author.
    pub fn author_username(&self) -> Option<&str> {
        self.created_by.as_ref().map(|p| p.username.as_str())
    }
}
