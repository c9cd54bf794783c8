//! Campus event types. Plain timestamped records, no membership semantics.

use chrono::{DateTime, NaiveDate, Utc};

use super::{EventId, UserId};

/// Campus event record
#[derive(Clone, Debug)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    /// Free-form category tag (academic, social, sports, ...).
    pub category: String,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Parameters for creating an event
#[derive(Clone, Debug)]
pub struct CreateEventParams {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: String,
    pub creator_id: UserId,
}
