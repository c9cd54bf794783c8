//! Group Registry: owns group records and the capacity/creator semantics.

use std::sync::Arc;

use tracing::info;

use campus_storage::{CreateGroupParams, GroupId, Store, StudyGroup, UserId};

use crate::error::{not_found, CoreError};

/// Input for creating a study group.
#[derive(Clone, Debug)]
pub struct NewGroup {
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    pub max_members: u32,
    pub meeting_time: Option<String>,
    pub location: Option<String>,
}

pub struct GroupRegistry {
    store: Arc<dyn Store>,
}

impl GroupRegistry {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a group; the creator becomes its first member atomically with
    /// creation.
    pub async fn create_group(
        &self,
        creator_id: &UserId,
        group: NewGroup,
    ) -> Result<GroupId, CoreError> {
        let name = group.name.trim();
        let subject = group.subject.trim();
        if name.is_empty() {
            return Err(CoreError::validation("group name is required"));
        }
        if subject.is_empty() {
            return Err(CoreError::validation("group subject is required"));
        }
        if group.max_members == 0 {
            return Err(CoreError::validation("max_members must be at least 1"));
        }

        let group_id = self
            .store
            .create_group(&CreateGroupParams {
                name: name.to_string(),
                subject: subject.to_string(),
                description: group.description,
                max_members: group.max_members,
                meeting_time: group.meeting_time,
                location: group.location,
                creator_id: creator_id.clone(),
            })
            .await?;

        info!(group = %group_id.0, creator = %creator_id.0, "study group created");
        Ok(group_id)
    }

    /// Get a group by id. Deactivated groups still resolve so existing
    /// members keep access to their history.
    pub async fn get_group(&self, group_id: &GroupId) -> Result<StudyGroup, CoreError> {
        self.store.get_group(group_id).await.map_err(not_found)
    }

    /// Active groups only; `subject_filter` is a case-sensitive substring
    /// match when present.
    pub async fn list_groups(
        &self,
        subject_filter: Option<&str>,
    ) -> Result<Vec<StudyGroup>, CoreError> {
        Ok(self
            .store
            .list_groups(subject_filter.map(str::to_string))
            .await?)
    }

    pub async fn is_member(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<bool, CoreError> {
        Ok(self.store.is_member(group_id, user_id).await?)
    }

    pub async fn member_count(&self, group_id: &GroupId) -> Result<u32, CoreError> {
        Ok(self.store.member_count(group_id).await?)
    }

    /// Soft-deactivate: the group leaves discovery but keeps its records.
    /// One-way; no reactivation path exists.
    pub async fn deactivate(&self, group_id: &GroupId) -> Result<(), CoreError> {
        self.store
            .deactivate_group(group_id)
            .await
            .map_err(not_found)?;
        info!(group = %group_id.0, "study group deactivated");
        Ok(())
    }
}
