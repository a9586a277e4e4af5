//! Tickets Service
//!
//! Loads and edits tickets through the [`TicketsClient`], maps them into the
//! domain model and answers which edits the signed-in user is offered.

use std::sync::Arc;

use sundenbock_core::mapping::{MappingSpec, transform, transform_collection};
use sundenbock_core::paging::{Page, PageQuery};
use sundenbock_core::ticket::{Ticket, TicketPermissions, TicketStatus};
use sundenbock_core::{Result, SundenbockError};
use sundenbock_infrastructure::client::TicketsClient;
use sundenbock_infrastructure::dto::{CreateTicketDto, UpdateTicketDto, create_ticket_spec};

use crate::session::SessionContext;

/// Service for ticket lists, details and edits
pub struct TicketsService {
    client: Arc<dyn TicketsClient>,
    session: Arc<SessionContext>,
    spec: MappingSpec<Ticket>,
    default_page_size: u32,
}

impl TicketsService {
    /// Create a new TicketsService
    ///
    /// Fails only if the ticket mapping spec is inconsistent with the model.
    pub fn new(
        client: Arc<dyn TicketsClient>,
        session: Arc<SessionContext>,
        default_page_size: u32,
    ) -> Result<Self> {
        Ok(Self {
            client,
            session,
            spec: create_ticket_spec()?,
            default_page_size,
        })
    }

    /// One page of tickets. A ticket that fails to map fails the whole page.
    pub async fn list(&self, query: PageQuery) -> Result<Page<Ticket>> {
        let query = query.with_defaults(self.default_page_size);
        let page = self.client.list(&query).await?;
        let tickets = transform_collection(&page, &self.spec)?;
        tracing::debug!(
            count = tickets.items.len(),
            total = tickets.total,
            "Loaded tickets"
        );
        Ok(tickets)
    }

    pub async fn get(&self, id: u64) -> Result<Ticket> {
        let dto = self.client.get(id).await?;
        Ok(transform(&dto, &self.spec)?)
    }

    pub async fn create(&self, body: &CreateTicketDto) -> Result<Ticket> {
        let dto = self.client.create(body).await?;
        let ticket = transform(&dto, &self.spec)?;
        tracing::info!(ticket_id = ticket.id, "Ticket created");
        Ok(ticket)
    }

    /// Sends an edit. Status changes the current user is not offered are
    /// rejected locally; the backend still has the final say.
    pub async fn update(&self, ticket: &Ticket, body: &UpdateTicketDto) -> Result<Ticket> {
        let actor = self.session.actor();
        let permissions = TicketPermissions::new(&actor, ticket);
        if !permissions.can_edit() {
            return Err(SundenbockError::security(format!(
                "Ticket {} cannot be edited by the current user",
                ticket.id
            )));
        }
        if !permissions.status_options_for_edit().contains(&body.status) {
            return Err(SundenbockError::security(format!(
                "Status change to {} is not allowed here",
                body.status.as_str()
            )));
        }

        let dto = self.client.update(ticket.id, body).await?;
        let updated = transform(&dto, &self.spec)?;
        tracing::info!(
            ticket_id = updated.id,
            status = updated.status.as_str(),
            "Ticket updated"
        );
        Ok(updated)
    }

    /// Assigns the ticket to the current developer, moving open tickets to
    /// `IN_PROGRESS`.
    pub async fn assign_to_me(&self, ticket: &Ticket) -> Result<Ticket> {
        let actor = self.session.actor();
        let permissions = TicketPermissions::new(&actor, ticket);
        let assignment = permissions
            .self_assignment()
            .filter(|_| permissions.can_self_assign())
            .ok_or_else(|| {
                SundenbockError::security(format!(
                    "Ticket {} cannot be self-assigned by the current user",
                    ticket.id
                ))
            })?;
        let project_id = ticket
            .project
            .as_ref()
            .map(|p| p.id)
            .ok_or_else(|| SundenbockError::not_found("Project", format!("of ticket {}", ticket.id)))?;

        let mut body =
            UpdateTicketDto::from_ticket(ticket, project_id, assignment.responsible_person_user_name);
        body.status = assignment.status;

        let dto = self.client.update(ticket.id, &body).await?;
        let updated = transform(&dto, &self.spec)?;
        tracing::info!(ticket_id = updated.id, "Ticket self-assigned");
        Ok(updated)
    }

    /// Whether the edit form may be opened for this ticket.
    pub fn can_edit(&self, ticket: &Ticket) -> bool {
        let actor = self.session.actor();
        TicketPermissions::new(&actor, ticket).can_edit()
    }

    /// Statuses offered when editing this ticket.
    pub fn status_options_for_edit(&self, ticket: &Ticket) -> Vec<TicketStatus> {
        let actor = self.session.actor();
        TicketPermissions::new(&actor, ticket).status_options_for_edit()
    }

    pub fn can_self_assign(&self, ticket: &Ticket) -> bool {
        let actor = self.session.actor();
        TicketPermissions::new(&actor, ticket).can_self_assign()
    }

    pub fn can_search_developers(&self, ticket: &Ticket) -> bool {
        let actor = self.session.actor();
        TicketPermissions::new(&actor, ticket).can_search_developers()
    }
}
