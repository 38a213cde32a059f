//! Event model matching the front end's Event interface.

use serde::{Deserialize, Serialize};

use super::Identity;

/// Organizer used when a draft names none and nobody is signed in.
pub const FALLBACK_ORGANIZATION_ID: &str = "org-1";
pub const FALLBACK_ORGANIZATION_NAME: &str = "Organization Name";

/// Cover image the create-event form starts with.
pub const DEFAULT_EVENT_IMAGE: &str = "https://images.unsplash.com/photo-1531206715517-5c0ba140b2b8?q=80&w=2070&auto=format&fit=crop&ixlib=rb-4.0.3";

/// Lifecycle stage of an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
}

/// A volunteer event published by an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub organization_id: String,
    pub organization_name: String,
    /// ISO-8601 timestamp, e.g. `2025-05-15T09:00:00`
    pub date: String,
    pub location: String,
    pub image_url: String,
    pub category: String,
    pub volunteers_needed: u32,
    /// Registered identity ids in registration order, no duplicates
    pub volunteers_registered: Vec<String>,
    pub status: EventStatus,
}

impl Event {
    /// Whether `volunteer_id` is among the registrants.
    pub fn is_registered(&self, volunteer_id: &str) -> bool {
        self.volunteers_registered.iter().any(|id| id == volunteer_id)
    }

    /// Open spots left. Negative when the event is over-registered.
    pub fn available_spots(&self) -> i64 {
        i64::from(self.volunteers_needed) - self.volunteers_registered.len() as i64
    }
}

/// Request body for creating a new event.
///
/// The directory assigns `id`, `status` and `volunteersRegistered` itself.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_image_url")]
    pub image_url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_volunteers_needed")]
    pub volunteers_needed: u32,
}

fn default_image_url() -> String {
    DEFAULT_EVENT_IMAGE.to_string()
}

fn default_category() -> String {
    "community".to_string()
}

fn default_volunteers_needed() -> u32 {
    10
}

impl EventDraft {
    /// Required-field check the organization dashboard performs before creating.
    pub fn missing_required(&self) -> Option<&'static str> {
        [
            ("title", &self.title),
            ("description", &self.description),
            ("date", &self.date),
            ("location", &self.location),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// Attribute the draft to `organizer` where it names no organization.
    pub fn fill_organizer(&mut self, organizer: Option<&Identity>) {
        if self.organization_id.trim().is_empty() {
            self.organization_id = organizer
                .map(|i| i.id.clone())
                .unwrap_or_else(|| FALLBACK_ORGANIZATION_ID.to_string());
        }
        if self.organization_name.trim().is_empty() {
            self.organization_name = organizer
                .map(|i| i.name.clone())
                .unwrap_or_else(|| FALLBACK_ORGANIZATION_NAME.to_string());
        }
    }
}

/// Request body for registering a volunteer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub volunteer_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Event {
        Event {
            id: "event-1".into(),
            title: "Beach Cleanup Drive".into(),
            description: "Shoreline".into(),
            organization_id: "org-1".into(),
            organization_name: "EcoFriends".into(),
            date: "2025-05-15T09:00:00".into(),
            location: "Sunset Beach, CA".into(),
            image_url: String::new(),
            category: "environment".into(),
            volunteers_needed: 2,
            volunteers_registered: vec!["user-1".into(), "user-2".into(), "user-3".into()],
            status: EventStatus::Upcoming,
        }
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["organizationId"], "org-1");
        assert_eq!(json["volunteersNeeded"], 2);
        assert_eq!(json["volunteersRegistered"][2], "user-3");
        assert_eq!(json["status"], "upcoming");
    }

    #[test]
    fn test_available_spots_can_go_negative() {
        assert_eq!(sample().available_spots(), -1);
        assert!(sample().is_registered("user-2"));
        assert!(!sample().is_registered("user-9"));
    }

    #[test]
    fn test_missing_required() {
        let mut draft = EventDraft {
            title: "Tree planting".into(),
            description: "Plant trees".into(),
            date: "2025-07-01T08:00:00".into(),
            location: "   ".into(),
            ..Default::default()
        };
        assert_eq!(draft.missing_required(), Some("location"));
        draft.location = "Central Park".into();
        assert_eq!(draft.missing_required(), None);
    }

    #[test]
    fn test_draft_form_defaults() {
        let draft: EventDraft = serde_json::from_str(r#"{"title":"Park Day"}"#).unwrap();
        assert_eq!(draft.category, "community");
        assert_eq!(draft.image_url, DEFAULT_EVENT_IMAGE);
        assert_eq!(draft.volunteers_needed, 10);
        assert_eq!(draft.organization_id, "");
    }

    #[test]
    fn test_fill_organizer() {
        let organizer = Identity {
            id: "user-42".into(),
            name: "EcoFriends".into(),
            email: "team@ecofriends.org".into(),
            role: crate::models::Role::Organization,
            profile_image: None,
        };

        let mut draft = EventDraft::default();
        draft.fill_organizer(Some(&organizer));
        assert_eq!(draft.organization_id, "user-42");
        assert_eq!(draft.organization_name, "EcoFriends");

        let mut anonymous = EventDraft::default();
        anonymous.fill_organizer(None);
        assert_eq!(anonymous.organization_id, FALLBACK_ORGANIZATION_ID);
        assert_eq!(anonymous.organization_name, FALLBACK_ORGANIZATION_NAME);

        let mut named = EventDraft {
            organization_id: "org-7".into(),
            ..Default::default()
        };
        named.fill_organizer(Some(&organizer));
        assert_eq!(named.organization_id, "org-7");
        assert_eq!(named.organization_name, "EcoFriends");
    }
}
