//! Users Service
//!
//! Lists users, loads their details and edits the signed-in user's own
//! profile.

use std::sync::Arc;

use sundenbock_core::mapping::{MappingSpec, transform};
use sundenbock_core::user::{User, UserPatch};
use sundenbock_core::{Result, SundenbockError};
use sundenbock_infrastructure::client::UsersClient;
use sundenbock_infrastructure::dto::{UserDetailDto, create_user_spec};

use crate::session::SessionContext;

pub struct UsersService {
    client: Arc<dyn UsersClient>,
    session: Arc<SessionContext>,
    spec: MappingSpec<User>,
}

impl UsersService {
    pub fn new(client: Arc<dyn UsersClient>, session: Arc<SessionContext>) -> Result<Self> {
        Ok(Self {
            client,
            session,
            spec: create_user_spec()?,
        })
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let dtos = self.client.list_all().await?;
        dtos.iter()
            .map(|dto| transform(dto, &self.spec).map_err(SundenbockError::from))
            .collect()
    }

    pub async fn details(&self, username: &str) -> Result<User> {
        let dto = self.client.get_details(username).await?;
        Ok(transform(&dto, &self.spec)?)
    }

    /// Edits the signed-in user's profile.
    ///
    /// The backend replaces the whole record, so the current details are
    /// loaded first and `patch` is merged onto them. The session's cached
    /// profile is replaced with the result.
    ///
    /// # Errors
    ///
    /// Returns `Security` when nobody is signed in.
    pub async fn update_self(&self, patch: UserPatch) -> Result<User> {
        let username = self
            .session
            .username()
            .ok_or_else(|| SundenbockError::security("No signed-in user to update"))?;

        let current = self.details(&username).await?;
        let merged = patch.merge_onto(current);
        let body = UserDetailDto::from(&merged);
        let dto = self.client.update_by_username(&username, &body).await?;
        let updated = transform(&dto, &self.spec)?;
        tracing::info!(username = %updated.username, "Profile updated");
        self.session.replace_profile(updated.clone());
        Ok(updated)
    }
}
