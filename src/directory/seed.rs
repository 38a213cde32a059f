//! Demo events the front end ships with.

use crate::models::{Event, EventStatus};

struct SeedEvent {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    organization_id: &'static str,
    organization_name: &'static str,
    date: &'static str,
    location: &'static str,
    image_url: &'static str,
    category: &'static str,
    volunteers_needed: u32,
    volunteers_registered: &'static [&'static str],
}

const SEED: &[SeedEvent] = &[
    SeedEvent {
        id: "event-1",
        title: "Beach Cleanup Drive",
        description: "Join us for a day of cleaning the shoreline and protecting marine life. Gloves and bags will be provided.",
        organization_id: "org-1",
        organization_name: "EcoFriends",
        date: "2025-05-15T09:00:00",
        location: "Sunset Beach, CA",
        image_url: "https://images.unsplash.com/photo-1618477462146-817de7cfe8c9?q=80&w=1000",
        category: "environment",
        volunteers_needed: 50,
        volunteers_registered: &["user-1", "user-2"],
    },
    SeedEvent {
        id: "event-2",
        title: "Food Bank Assistant",
        description: "Help us sort donations and prepare food packages for distribution to families in need.",
        organization_id: "org-2",
        organization_name: "Community Helpers",
        date: "2025-05-20T14:00:00",
        location: "Downtown Community Center",
        image_url: "https://images.unsplash.com/photo-1593113630400-ea4288922497?q=80&w=1000",
        category: "community",
        volunteers_needed: 20,
        volunteers_registered: &["user-3"],
    },
    SeedEvent {
        id: "event-3",
        title: "Tech Workshop for Seniors",
        description: "Teach basic technology skills to seniors in our community. Help them connect with family online.",
        organization_id: "org-3",
        organization_name: "Silver Tech",
        date: "2025-05-22T10:00:00",
        location: "Senior Living Community",
        image_url: "https://images.unsplash.com/photo-1587825140708-dfaf72ae4b04?q=80&w=1000",
        category: "education",
        volunteers_needed: 10,
        volunteers_registered: &["user-1", "user-4"],
    },
    SeedEvent {
        id: "event-4",
        title: "Park Restoration Project",
        description: "Help us plant trees and restore the natural habitat in our city park.",
        organization_id: "org-1",
        organization_name: "EcoFriends",
        date: "2025-06-01T08:00:00",
        location: "Central Park",
        image_url: "https://images.unsplash.com/photo-1561370658-326595df2e83?q=80&w=1000",
        category: "environment",
        volunteers_needed: 30,
        volunteers_registered: &[],
    },
    SeedEvent {
        id: "event-5",
        title: "After-School Tutoring",
        description: "Provide academic support to elementary school students in math and reading.",
        organization_id: "org-4",
        organization_name: "Education For All",
        date: "2025-06-05T15:30:00",
        location: "Lincoln Elementary School",
        image_url: "https://images.unsplash.com/photo-1503676382389-4809596d5290?q=80&w=1000",
        category: "education",
        volunteers_needed: 15,
        volunteers_registered: &["user-2"],
    },
];

pub(super) fn demo_events() -> Vec<Event> {
    SEED.iter()
        .map(|seed| Event {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            organization_id: seed.organization_id.to_string(),
            organization_name: seed.organization_name.to_string(),
            date: seed.date.to_string(),
            location: seed.location.to_string(),
            image_url: seed.image_url.to_string(),
            category: seed.category.to_string(),
            volunteers_needed: seed.volunteers_needed,
            volunteers_registered: seed
                .volunteers_registered
                .iter()
                .map(|id| id.to_string())
                .collect(),
            status: EventStatus::Upcoming,
        })
        .collect()
}
