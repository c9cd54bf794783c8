//! Resource Ledger: append-only shared notes/links/files per group.

use std::sync::Arc;

use tracing::debug;

use campus_storage::{CreateResourceParams, GroupId, Resource, ResourceKind, Store, UserId};

use crate::error::{not_found, CoreError};

/// Input for adding a shared resource.
#[derive(Clone, Debug)]
pub struct NewResource {
    pub title: String,
    pub kind: ResourceKind,
    pub description: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
}

pub struct ResourceLedger {
    store: Arc<dyn Store>,
}

impl ResourceLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Add a resource to a group. Requires membership; the title must be
    /// non-empty after trimming.
    pub async fn add_resource(
        &self,
        group_id: &GroupId,
        creator_id: &UserId,
        resource: NewResource,
    ) -> Result<Resource, CoreError> {
        self.store.get_group(group_id).await.map_err(not_found)?;

        if !self.store.is_member(group_id, creator_id).await? {
            return Err(CoreError::Forbidden);
        }

        let title = resource.title.trim();
        if title.is_empty() {
            return Err(CoreError::validation("resource title is required"));
        }

        let created = self
            .store
            .add_resource(&CreateResourceParams {
                group_id: group_id.clone(),
                creator_id: creator_id.clone(),
                title: title.to_string(),
                kind: resource.kind,
                description: resource.description,
                content: resource.content,
                file_url: resource.file_url,
            })
            .await?;

        debug!(group = %group_id.0, resource = %created.id.0, "resource added");
        Ok(created)
    }

    /// All resources for a group, newest first. Requires membership.
    pub async fn list_resources(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<Vec<Resource>, CoreError> {
        self.store.get_group(group_id).await.map_err(not_found)?;

        if !self.store.is_member(group_id, user_id).await? {
            return Err(CoreError::Forbidden);
        }

        Ok(self.store.list_resources(group_id).await?)
    }
}
