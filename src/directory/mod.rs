//! Event directory: the in-memory event collection.
//!
//! Every read hands back owned copies, so callers never observe later
//! mutations. Operations are async to keep the shape of a remote API.

mod seed;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::clock::{Clock, IdSequence};
use crate::errors::AppError;
use crate::models::{Event, EventDraft, EventStatus};

/// Owns every event record.
pub struct EventDirectory {
    events: RwLock<Vec<Event>>,
    clock: Arc<dyn Clock>,
    ids: IdSequence,
}

impl EventDirectory {
    /// An empty directory.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_events(clock, Vec::new())
    }

    /// A directory holding the five demo events.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        Self::with_events(clock, seed::demo_events())
    }

    pub fn with_events(clock: Arc<dyn Clock>, events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
            clock,
            ids: IdSequence::new(),
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Every event in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.events.read().await.clone())
    }

    pub async fn list_by_organization(&self, organization_id: &str) -> Result<Vec<Event>, AppError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.organization_id == organization_id)
            .cloned()
            .collect())
    }

    /// Events the volunteer is registered for.
    pub async fn list_by_volunteer(&self, volunteer_id: &str) -> Result<Vec<Event>, AppError> {
        Ok(self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.is_registered(volunteer_id))
            .cloned()
            .collect())
    }

    pub async fn get_by_id(&self, event_id: &str) -> Result<Event, AppError> {
        self.events
            .read()
            .await
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| AppError::EventNotFound(event_id.to_string()))
    }

    /// Store a new event. Field validation is left to the caller.
    pub async fn create(&self, draft: EventDraft) -> Result<Event, AppError> {
        let event = Event {
            id: self.ids.next("event", self.clock.now()),
            title: draft.title,
            description: draft.description,
            organization_id: draft.organization_id,
            organization_name: draft.organization_name,
            date: draft.date,
            location: draft.location,
            image_url: draft.image_url,
            category: draft.category,
            volunteers_needed: draft.volunteers_needed,
            volunteers_registered: Vec::new(),
            status: EventStatus::Upcoming,
        };

        self.events.write().await.push(event.clone());
        tracing::info!(
            "Created event {} for organization {}",
            event.id,
            event.organization_id
        );
        Ok(event)
    }

    /// Append `volunteer_id` to the event's registrants.
    ///
    /// `volunteersNeeded` is not enforced as a cap.
    pub async fn register(&self, event_id: &str, volunteer_id: &str) -> Result<Event, AppError> {
        let mut events = self.events.write().await;
        let event = find_mut(&mut events, event_id)?;

        if event.is_registered(volunteer_id) {
            return Err(AppError::AlreadyRegistered);
        }

        event.volunteers_registered.push(volunteer_id.to_string());
        if event.available_spots() < 0 {
            tracing::debug!(
                "Event {} over-registered: {} of {} needed",
                event.id,
                event.volunteers_registered.len(),
                event.volunteers_needed
            );
        }
        tracing::info!("Registered {} for {}", volunteer_id, event_id);
        Ok(event.clone())
    }

    /// Remove `volunteer_id` from the event's registrants. Removing an absent
    /// id succeeds without change.
    pub async fn unregister(&self, event_id: &str, volunteer_id: &str) -> Result<Event, AppError> {
        let mut events = self.events.write().await;
        let event = find_mut(&mut events, event_id)?;

        let before = event.volunteers_registered.len();
        event.volunteers_registered.retain(|id| id != volunteer_id);
        if event.volunteers_registered.len() != before {
            tracing::info!("Unregistered {} from {}", volunteer_id, event_id);
        }
        Ok(event.clone())
    }
}

fn find_mut<'a>(events: &'a mut [Event], event_id: &str) -> Result<&'a mut Event, AppError> {
    events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or_else(|| AppError::EventNotFound(event_id.to_string()))
}
