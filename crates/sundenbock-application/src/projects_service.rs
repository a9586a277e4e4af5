//! Projects Service
//!
//! Thin facade over the [`ProjectsClient`] that hands out mapped [`Project`]s.

use std::sync::Arc;

use sundenbock_core::Result;
use sundenbock_core::mapping::{MappingSpec, transform, transform_collection};
use sundenbock_core::paging::{Page, PageQuery};
use sundenbock_core::project::Project;
use sundenbock_infrastructure::client::ProjectsClient;
use sundenbock_infrastructure::dto::{CreateProjectDto, create_project_spec};

pub struct ProjectsService {
    client: Arc<dyn ProjectsClient>,
    spec: MappingSpec<Project>,
    default_page_size: u32,
}

impl ProjectsService {
    pub fn new(client: Arc<dyn ProjectsClient>, default_page_size: u32) -> Result<Self> {
        Ok(Self {
            client,
            spec: create_project_spec()?,
            default_page_size,
        })
    }

    pub async fn list(&self, query: PageQuery) -> Result<Page<Project>> {
        let query = query.with_defaults(self.default_page_size);
        let page = self.client.list(&query).await?;
        Ok(transform_collection(&page, &self.spec)?)
    }

    pub async fn get(&self, id: u64) -> Result<Project> {
        let dto = self.client.get(id).await?;
        Ok(transform(&dto, &self.spec)?)
    }

    pub async fn create(&self, body: &CreateProjectDto) -> Result<Project> {
        let dto = self.client.create(body).await?;
        let project = transform(&dto, &self.spec)?;
        tracing::info!(project_id = project.id, abbreviation = %project.abbreviation, "Project created");
        Ok(project)
    }
}
