//! Client-side ticket editing rules.
//!
//! These decide which controls are offered; the backend enforces the workflow.

use super::model::{Ticket, TicketStatus};

/// The acting user as seen by the ticket rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor {
    pub username: Option<String>,
    pub is_admin: bool,
    /// Holds a developer role. Administrators are never treated as developers.
    pub is_developer: bool,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(username: impl Into<String>, is_admin: bool, is_developer: bool) -> Self {
        Self {
            username: Some(username.into()),
            is_admin,
            is_developer: is_developer && !is_admin,
        }
    }

    fn is_author(&self, ticket: &Ticket) -> bool {
        match (&self.username, ticket.author_username()) {
            (Some(me), Some(author)) => me == author,
            _ => false,
        }
    }

    fn is_responsible(&self, ticket: &Ticket) -> bool {
        let Some(me) = self.username.as_deref() else {
            return false;
        };
        ticket.responsible_person_user_name.as_deref() == Some(me)
            || ticket
                .responsible_person
                .as_ref()
                .is_some_and(|p| p.username == me)
    }
}

/// Result of the "assign me" action: new responsible user and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfAssignment {
    pub responsible_person_user_name: String,
    pub status: TicketStatus,
}

/// Editing rules for one actor on one ticket.
#[derive(Debug, Clone, Copy)]
pub struct TicketPermissions<'a> {
    actor: &'a Actor,
    ticket: &'a Ticket,
}

impl<'a> TicketPermissions<'a> {
    pub fn new(actor: &'a Actor, ticket: &'a Ticket) -> Self {
        Self { actor, ticket }
    }

    /// Whether the edit form may be opened at all.
    pub fn can_edit(&self) -> bool {
        if self.actor.username.is_none() {
            return false;
        }
        if self.actor.is_admin {
            return true;
        }

        let status = self.ticket.status;
        if status == TicketStatus::Closed {
            return false;
        }

        let is_author = self.actor.is_author(self.ticket);
        let is_responsible = self.actor.is_responsible(self.ticket);

        if status == TicketStatus::InProgress {
            if is_responsible {
                return true;
            }
            if is_author {
                return false;
            }
        }

        is_author
    }

    /// Statuses offered in the edit form. Always contains the current status.
    pub fn status_options_for_edit(&self) -> Vec<TicketStatus> {
        if self.actor.is_admin {
            return TicketStatus::ALL.to_vec();
        }

        let status = self.ticket.status;
        if self.actor.username.is_none() {
            return vec![status];
        }

        if status == TicketStatus::InProgress && self.actor.is_responsible(self.ticket) {
            return vec![
                TicketStatus::InProgress,
                TicketStatus::Resolved,
                TicketStatus::Rejected,
            ];
        }

        if matches!(status, TicketStatus::Resolved | TicketStatus::Rejected)
            && self.actor.is_author(self.ticket)
        {
            return vec![status, TicketStatus::Closed, TicketStatus::Reopened];
        }

        vec![status]
    }

    /// Only administrators may search for developers to assign.
    pub fn can_search_developers(&self) -> bool {
        self.actor.is_admin
    }

    /// Developers may take over tickets nobody is working on.
    pub fn can_self_assign(&self) -> bool {
        self.actor.is_developer && self.ticket.status.is_open()
    }

    /// Computes the change made by "assign me".
    ///
    /// Open tickets move to `IN_PROGRESS`; other statuses are kept.
    pub fn self_assignment(&self) -> Option<SelfAssignment> {
        let me = self.actor.username.clone()?;
        let status = if self.ticket.status.is_open() {
            TicketStatus::InProgress
        } else {
            self.ticket.status
        };
        Some(SelfAssignment {
            responsible_person_user_name: me,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::TicketResponsible;
    use chrono::{TimeZone, Utc};

    fn person(username: &str) -> TicketResponsible {
        TicketResponsible {
            id: 1,
            username: username.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    fn ticket(status: TicketStatus, author: &str, responsible: Option<&str>) -> Ticket {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Ticket {
            id: 7,
            title: "Printer on fire".to_string(),
            description: Some("again".to_string()),
            project: None,
            status,
            ticket_key: None,
            responsible_person: responsible.map(person),
            responsible_person_user_name: None,
            created_date: at,
            last_modified_date: at,
            created_by: Some(person(author)),
            last_modified_by: None,
        }
    }

    #[test]
    fn test_admin_edits_everything() {
        let admin = Actor::new("root", true, true);
        let t = ticket(TicketStatus::Closed, "alice", None);
        let perms = TicketPermissions::new(&admin, &t);

        assert!(perms.can_edit());
        assert_eq!(perms.status_options_for_edit(), TicketStatus::ALL.to_vec());
        assert!(perms.can_search_developers());
        assert!(!perms.can_self_assign());
    }

    #[test]
    fn test_closed_is_read_only_for_author() {
        let alice = Actor::new("alice", false, false);
        let t = ticket(TicketStatus::Closed, "alice", None);
        assert!(!TicketPermissions::new(&alice, &t).can_edit());
    }

    #[test]
    fn test_in_progress_belongs_to_responsible() {
        let alice = Actor::new("alice", false, false);
        let bob = Actor::new("bob", false, true);
        let t = ticket(TicketStatus::InProgress, "alice", Some("bob"));

        assert!(!TicketPermissions::new(&alice, &t).can_edit());
        let bob_perms = TicketPermissions::new(&bob, &t);
        assert!(bob_perms.can_edit());
        assert_eq!(
            bob_perms.status_options_for_edit(),
            vec![
                TicketStatus::InProgress,
                TicketStatus::Resolved,
                TicketStatus::Rejected
            ]
        );
    }

    #[test]
    fn test_responsible_by_username_field() {
        let bob = Actor::new("bob", false, true);
        let mut t = ticket(TicketStatus::InProgress, "alice", None);
        t.responsible_person_user_name = Some("bob".to_string());
        assert!(TicketPermissions::new(&bob, &t).can_edit());
    }

    #[test]
    fn test_author_closes_or_reopens_resolved() {
        let alice = Actor::new("alice", false, false);
        let t = ticket(TicketStatus::Resolved, "alice", Some("bob"));
        let perms = TicketPermissions::new(&alice, &t);

        assert!(perms.can_edit());
        assert_eq!(
            perms.status_options_for_edit(),
            vec![
                TicketStatus::Resolved,
                TicketStatus::Closed,
                TicketStatus::Reopened
            ]
        );
    }

    #[test]
    fn test_author_edits_created_without_status_change() {
        let alice = Actor::new("alice", false, false);
        let t = ticket(TicketStatus::Created, "alice", None);
        let perms = TicketPermissions::new(&alice, &t);

        assert!(perms.can_edit());
        assert_eq!(perms.status_options_for_edit(), vec![TicketStatus::Created]);
    }

    #[test]
    fn test_stranger_and_anonymous_cannot_edit() {
        let carol = Actor::new("carol", false, false);
        let t = ticket(TicketStatus::Created, "alice", None);
        assert!(!TicketPermissions::new(&carol, &t).can_edit());

        let nobody = Actor::anonymous();
        let perms = TicketPermissions::new(&nobody, &t);
        assert!(!perms.can_edit());
        assert_eq!(perms.status_options_for_edit(), vec![TicketStatus::Created]);
        assert!(perms.self_assignment().is_none());
    }

    #[test]
    fn test_developer_self_assigns_open_ticket() {
        let dev = Actor::new("dave", false, true);
        let t = ticket(TicketStatus::Reopened, "alice", None);
        let perms = TicketPermissions::new(&dev, &t);

        assert!(perms.can_self_assign());
        assert_eq!(
            perms.self_assignment(),
            Some(SelfAssignment {
                responsible_person_user_name: "dave".to_string(),
                status: TicketStatus::InProgress,
            })
        );

        let resolved = ticket(TicketStatus::Resolved, "alice", None);
        assert!(!TicketPermissions::new(&dev, &resolved).can_self_assign());
    }
}
