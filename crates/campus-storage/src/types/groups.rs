//! Study group types and the membership join relation.

use chrono::{DateTime, Utc};

use super::{GroupId, UserId};

/// Study group record.
///
/// `max_members` is fixed at creation; the member count never exceeds it.
/// Deactivation is one-way: a deactivated group disappears from discovery but
/// stays resolvable by id so existing members keep their history.
#[derive(Clone, Debug)]
pub struct StudyGroup {
    pub id: GroupId,
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    pub max_members: u32,
    pub meeting_time: Option<String>,
    pub location: Option<String>,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Group membership record
#[derive(Clone, Debug)]
pub struct GroupMember {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Parameters for creating a study group
#[derive(Clone, Debug)]
pub struct CreateGroupParams {
    pub name: String,
    pub subject: String,
    pub description: Option<String>,
    pub max_members: u32,
    pub meeting_time: Option<String>,
    pub location: Option<String>,
    pub creator_id: UserId,
}
