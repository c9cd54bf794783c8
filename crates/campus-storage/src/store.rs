//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The storage trait `campus-core` depends on.
///
/// Messages and resources are **scoped by group**; membership rows are keyed
/// by `(group_id, user_id)` and exposed only as add/remove/contains/count so
/// the capacity invariant stays enforceable in one place.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Users ──────────────────────────────────────────

    /// Create a new user (returns generated ID).
    async fn create_user(&self, params: &CreateUserParams) -> Result<UserId, StoreError>;

    /// Get user by ID.
    async fn get_user(&self, user_id: &UserId) -> Result<User, StoreError>;

    /// Get user by username.
    async fn get_user_by_username(&self, username: &str) -> Result<User, StoreError>;

    // ───────────────────────────────────── Groups ─────────────────────────────────────────

    /// Create a study group and add the creator as its first member, in one
    /// transaction.
    async fn create_group(&self, params: &CreateGroupParams) -> Result<GroupId, StoreError>;

    /// Get group by ID. Resolves deactivated groups too; discovery filtering
    /// happens in `list_groups`.
    async fn get_group(&self, group_id: &GroupId) -> Result<StudyGroup, StoreError>;

    /// List active groups, optionally narrowed to subjects containing
    /// `subject_filter` (case-sensitive substring).
    async fn list_groups(
        &self,
        subject_filter: Option<String>,
    ) -> Result<Vec<StudyGroup>, StoreError>;

    /// Soft-deactivate a group. One-way; there is no reactivation.
    async fn deactivate_group(&self, group_id: &GroupId) -> Result<(), StoreError>;

    // ───────────────────────────────────── Membership ─────────────────────────────────────

    /// Add a user to a group, enforcing capacity in the same statement as the
    /// insert. Fails `Conflict` when the group already holds `max_members`
    /// members and `AlreadyExists` when the user is already a member.
    async fn add_member(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
        max_members: u32,
    ) -> Result<(), StoreError>;

    /// Remove a user from a group. Fails `NotFound` when no membership row
    /// exists.
    async fn remove_member(&self, group_id: &GroupId, user_id: &UserId)
        -> Result<(), StoreError>;

    /// Whether the user is currently a member of the group.
    async fn is_member(&self, group_id: &GroupId, user_id: &UserId) -> Result<bool, StoreError>;

    /// Current member count for a group.
    async fn member_count(&self, group_id: &GroupId) -> Result<u32, StoreError>;

    /// List all members of a group.
    async fn list_members(&self, group_id: &GroupId) -> Result<Vec<GroupMember>, StoreError>;

    // ───────────────────────────────────── Messages ───────────────────────────────────────

    /// Append a message; the store assigns id and timestamp.
    async fn append_message(&self, params: &CreateMessageParams) -> Result<Message, StoreError>;

    /// The most recent `limit` messages for a group, newest first.
    async fn recent_messages(
        &self,
        group_id: &GroupId,
        limit: u32,
    ) -> Result<Vec<Message>, StoreError>;

    /// Total number of messages in a group.
    async fn count_messages(&self, group_id: &GroupId) -> Result<u64, StoreError>;

    // ───────────────────────────────────── Resources ──────────────────────────────────────

    /// Add a shared resource; the store assigns id and timestamp.
    async fn add_resource(&self, params: &CreateResourceParams) -> Result<Resource, StoreError>;

    /// All resources for a group, newest first.
    async fn list_resources(&self, group_id: &GroupId) -> Result<Vec<Resource>, StoreError>;

    /// Total number of resources in a group.
    async fn count_resources(&self, group_id: &GroupId) -> Result<u64, StoreError>;

    // ───────────────────────────────────── Events ─────────────────────────────────────────

    /// Create a campus event (returns generated ID).
    async fn create_event(&self, params: &CreateEventParams) -> Result<EventId, StoreError>;

    /// List active events, newest date first, optionally narrowed to an exact
    /// category.
    async fn list_events(&self, category: Option<String>) -> Result<Vec<Event>, StoreError>;
}
