//! Collaboration Log: append-only group chat with bounded, ordered retrieval.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use campus_storage::{CreateMessageParams, GroupId, Message, Store, UserId};

use crate::error::{not_found, CoreError};

/// How many messages a dashboard or poll fetch returns at most.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 50;

/// A freshly posted message, with the sender's display name and a short
/// `HH:MM` label ready for rendering.
#[derive(Clone, Debug)]
pub struct PostedMessage {
    pub message: Message,
    pub sender_name: String,
    pub time_label: String,
}

/// A message as seen by a particular member. `is_own` is computed per
/// request and never stored.
#[derive(Clone, Debug)]
pub struct MessageView {
    pub message: Message,
    pub sender_name: String,
    pub time_label: String,
    pub is_own: bool,
}

pub struct CollaborationLog {
    store: Arc<dyn Store>,
}

fn time_label(message: &Message) -> String {
    message.created_at.format("%H:%M").to_string()
}

impl CollaborationLog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Post a message to a group's chat. Requires membership; content must be
    /// non-empty after trimming.
    pub async fn post_message(
        &self,
        group_id: &GroupId,
        sender_id: &UserId,
        content: &str,
    ) -> Result<PostedMessage, CoreError> {
        self.store.get_group(group_id).await.map_err(not_found)?;

        if !self.store.is_member(group_id, sender_id).await? {
            return Err(CoreError::Forbidden);
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(CoreError::validation("message cannot be empty"));
        }

        let message = self
            .store
            .append_message(&CreateMessageParams {
                group_id: group_id.clone(),
                sender_id: sender_id.clone(),
                content: content.to_string(),
            })
            .await?;
        let sender = self.store.get_user(sender_id).await?;

        debug!(group = %group_id.0, message = %message.id.0, "message posted");
        Ok(PostedMessage {
            time_label: time_label(&message),
            sender_name: sender.full_name,
            message,
        })
    }

    /// The most recent `limit` messages, presented oldest first.
    ///
    /// The cap is applied newest-first and the result then reversed, so a
    /// busy chat still reads top to bottom while retrieval stays bounded.
    pub async fn recent_messages(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<MessageView>, CoreError> {
        self.store.get_group(group_id).await.map_err(not_found)?;

        if !self.store.is_member(group_id, user_id).await? {
            return Err(CoreError::Forbidden);
        }

        let mut messages = self.store.recent_messages(group_id, limit).await?;
        messages.reverse();

        let mut names: HashMap<UserId, String> = HashMap::new();
        let mut out = Vec::with_capacity(messages.len());
        for message in messages {
            let sender_name = match names.get(&message.sender_id) {
                Some(name) => name.clone(),
                None => {
                    let user = self.store.get_user(&message.sender_id).await?;
                    names.insert(message.sender_id.clone(), user.full_name.clone());
                    user.full_name
                }
            };
            out.push(MessageView {
                time_label: time_label(&message),
                sender_name,
                is_own: message.sender_id == *user_id,
                message,
            });
        }
        Ok(out)
    }
}
