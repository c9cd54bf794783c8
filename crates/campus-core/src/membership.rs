//! Membership Controller: join/leave with idempotence and capacity checks.

use std::sync::Arc;

use tracing::info;

use campus_storage::{GroupId, Store, StoreError, UserId};

use crate::error::{not_found, CoreError};

/// Result of a join attempt. `AlreadyMember` and `GroupFull` are expected
/// outcomes, not failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
    GroupFull,
}

/// Result of a leave attempt. Leaving a group you're not in is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    NotMember,
}

pub struct MembershipController {
    store: Arc<dyn Store>,
}

impl MembershipController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Join a group. The store performs the capacity check and the insert as
    /// one step, so concurrent joins cannot overfill the group; the
    /// `is_member` pre-check just reports the common repeat-click case
    /// without touching state.
    pub async fn join(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<JoinOutcome, CoreError> {
        let group = self.store.get_group(group_id).await.map_err(not_found)?;

        if self.store.is_member(group_id, user_id).await? {
            return Ok(JoinOutcome::AlreadyMember);
        }

        match self
            .store
            .add_member(group_id, user_id, group.max_members)
            .await
        {
            Ok(()) => {
                info!(group = %group_id.0, user = %user_id.0, "user joined group");
                Ok(JoinOutcome::Joined)
            }
            Err(StoreError::Conflict) => Ok(JoinOutcome::GroupFull),
            // Raced another join by the same user between check and insert.
            Err(StoreError::AlreadyExists) => Ok(JoinOutcome::AlreadyMember),
            Err(e) => Err(CoreError::Store(e)),
        }
    }

    /// Leave a group. The departing creator stays recorded as `creator_id`
    /// for attribution; only live membership changes.
    pub async fn leave(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<LeaveOutcome, CoreError> {
        self.store.get_group(group_id).await.map_err(not_found)?;

        match self.store.remove_member(group_id, user_id).await {
            Ok(()) => {
                info!(group = %group_id.0, user = %user_id.0, "user left group");
                Ok(LeaveOutcome::Left)
            }
            Err(StoreError::NotFound) => Ok(LeaveOutcome::NotMember),
            Err(e) => Err(CoreError::Store(e)),
        }
    }
}
