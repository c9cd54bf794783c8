//! Event Board: campus event records. No membership semantics; any user can
//! create and browse events.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use campus_storage::{CreateEventParams, Event, EventId, Store, UserId};

use crate::error::CoreError;

/// Input for creating a campus event.
#[derive(Clone, Debug)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: String,
}

pub struct EventBoard {
    store: Arc<dyn Store>,
}

impl EventBoard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_event(
        &self,
        creator_id: &UserId,
        event: NewEvent,
    ) -> Result<EventId, CoreError> {
        let title = event.title.trim();
        if title.is_empty() {
            return Err(CoreError::validation("event title is required"));
        }
        if event.category.trim().is_empty() {
            return Err(CoreError::validation("event category is required"));
        }

        let event_id = self
            .store
            .create_event(&CreateEventParams {
                title: title.to_string(),
                description: event.description,
                date: event.date,
                time: event.time,
                location: event.location,
                category: event.category.trim().to_string(),
                creator_id: creator_id.clone(),
            })
            .await?;

        info!(event = %event_id.0, "event created");
        Ok(event_id)
    }

    /// Active events, newest date first; exact category match when present.
    pub async fn list_events(&self, category: Option<&str>) -> Result<Vec<Event>, CoreError> {
        Ok(self.store.list_events(category.map(str::to_string)).await?)
    }
}
