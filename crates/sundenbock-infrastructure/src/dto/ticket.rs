//! Ticket DTOs and their mapping spec.

use serde::{Deserialize, Serialize};

use sundenbock_core::mapping::{FieldRule, MappingError, MappingSpec, convert};
use sundenbock_core::ticket::{Ticket, TicketProjectRef, TicketResponsible, TicketStatus};

/// Responsible person or author as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponsiblePersonDto {
    pub id: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketProjectDto {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

/// A ticket as sent by the backend. Timestamps are ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<TicketResponsiblePersonDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person_user_name: Option<String>,
    /// Legacy assignee reference, superseded by `responsible_person`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<TicketProjectDto>,
    pub created_date: String,
    pub last_modified_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<TicketResponsiblePersonDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<TicketResponsiblePersonDto>,
}

/// Body of `POST /tickets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketDto {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person_user_name: Option<String>,
    pub project_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameRef {
    pub username: String,
}

/// Body of `PUT /tickets/{id}`. The backend expects the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketDto {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub project: IdRef,
    pub responsible_person: UsernameRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_key: Option<String>,
}

fn create_person_spec() -> Result<MappingSpec<TicketResponsible>, MappingError> {
    MappingSpec::builder()
        .keep_all(&["id", "username", "firstName", "lastName"])
        .build()
}

fn create_project_ref_spec() -> Result<MappingSpec<TicketProjectRef>, MappingError> {
    MappingSpec::builder()
        .keep_all(&["id", "title", "abbreviation"])
        .build()
}

/// Creates the `TicketDto` → [`Ticket`] spec.
///
/// Timestamps are parsed; people and the project are mapped recursively and
/// stay absent when the backend leaves them out. `assigneeId` is dropped.
pub fn create_ticket_spec() -> Result<MappingSpec<Ticket>, MappingError> {
    let person = create_person_spec()?;
    let project = create_project_ref_spec()?;

    MappingSpec::builder()
        .keep_all(&[
            "id",
            "title",
            "description",
            "status",
            "ticketKey",
            "responsiblePersonUserName",
        ])
        .rule("project", FieldRule::nested(&project))
        .rule("responsiblePerson", FieldRule::nested(&person))
        .rule("createdBy", FieldRule::nested(&person))
        .rule("lastModifiedBy", FieldRule::nested(&person))
        .rule("createdDate", FieldRule::map(convert::parse_date))
        .rule("lastModifiedDate", FieldRule::map(convert::parse_date))
        .build()
}

impl UpdateTicketDto {
    /// Builds an update from an edited ticket.
    pub fn from_ticket(
        ticket: &Ticket,
        project_id: u64,
        responsible_person_user_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title.clone(),
            description: ticket.description.clone().unwrap_or_default(),
            status: ticket.status,
            project: IdRef { id: project_id },
            responsible_person: UsernameRef {
                username: responsible_person_user_name.into(),
            },
            ticket_key: ticket.ticket_key.clone(),
        }
    }
}
