//! Group dashboard assembly: group details, recent chat, and resources in one
//! membership-gated fetch.

use std::sync::Arc;

use campus_storage::{GroupId, Resource, Store, StudyGroup, UserId};

use crate::chat::{CollaborationLog, MessageView, DEFAULT_MESSAGE_LIMIT};
use crate::error::{not_found, CoreError};
use crate::resources::ResourceLedger;

/// Everything a group's workspace page needs.
#[derive(Clone, Debug)]
pub struct Dashboard {
    pub group: StudyGroup,
    /// At most [`DEFAULT_MESSAGE_LIMIT`] messages, oldest first.
    pub messages: Vec<MessageView>,
    /// Newest first.
    pub resources: Vec<Resource>,
}

pub struct DashboardService {
    store: Arc<dyn Store>,
    chat: CollaborationLog,
    ledger: ResourceLedger,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            chat: CollaborationLog::new(store.clone()),
            ledger: ResourceLedger::new(store.clone()),
            store,
        }
    }

    /// Fetch a member's view of a group. Non-members get `Forbidden`;
    /// unknown groups get `NotFound`.
    pub async fn get_dashboard(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<Dashboard, CoreError> {
        let group = self.store.get_group(group_id).await.map_err(not_found)?;

        if !self.store.is_member(group_id, user_id).await? {
            return Err(CoreError::Forbidden);
        }

        let messages = self
            .chat
            .recent_messages(group_id, user_id, DEFAULT_MESSAGE_LIMIT)
            .await?;
        let resources = self.ledger.list_resources(group_id, user_id).await?;

        Ok(Dashboard {
            group,
            messages,
            resources,
        })
    }
}
