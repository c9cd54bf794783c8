//! Group chat message types.

use chrono::{DateTime, Utc};

use super::{GroupId, MessageId, UserId};

/// A single chat message. Immutable once created; the store assigns id and
/// timestamp at append time, and ties on `created_at` break by insertion
/// order.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: MessageId,
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Parameters for appending a message
#[derive(Clone, Debug)]
pub struct CreateMessageParams {
    pub group_id: GroupId,
    pub sender_id: UserId,
    pub content: String,
}
