//! Projects API.

use bountyboard_types::Project;

use crate::client::BountyClient;
use crate::error::Result;
use crate::types::{ListQuery, from_envelope};

/// Projects API client.
pub struct ProjectsApi {
    client: BountyClient,
}

impl ProjectsApi {
    pub(crate) fn new(client: BountyClient) -> Self {
        Self { client }
    }

    /// List projects.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Project>> {
        let body = self.client.get_with_query("projects", query.pairs()).await?;
        from_envelope(body, &["projects", "items"])
    }

    /// Get a project by ID.
    pub async fn get(&self, id: &str) -> Result<Project> {
        let body = self.client.get(&format!("projects/{}", id)).await?;
        from_envelope(body, &["project"])
    }
}
