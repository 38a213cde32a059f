//! Event API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{success, ApiResult};
use crate::browse::{self, BrowseQuery};
use crate::errors::AppError;
use crate::models::{Event, EventDraft, RegistrationRequest};
use crate::AppState;

/// GET /api/events - List events, optionally searched, filtered and sorted.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> ApiResult<Vec<Event>> {
    let events = state.directory.list_all().await?;
    success(browse::apply(events, &query))
}

/// GET /api/events/:id - Get a single event.
pub async fn get_event(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Event> {
    success(state.directory.get_by_id(&id).await?)
}

/// POST /api/events - Create a new event.
pub async fn create_event(
    State(state): State<AppState>,
    Json(mut draft): Json<EventDraft>,
) -> ApiResult<Event> {
    // Validate required fields
    if let Some(field) = draft.missing_required() {
        return Err(AppError::Validation(format!("{} is required", capitalize(field))));
    }

    let organizer = state.session.current().await;
    draft.fill_organizer(organizer.as_ref());

    success(state.directory.create(draft).await?)
}

/// POST /api/events/:id/registrations - Register a volunteer.
pub async fn register_volunteer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RegistrationRequest>,
) -> ApiResult<Event> {
    if request.volunteer_id.trim().is_empty() {
        return Err(AppError::Validation("volunteerId is required".to_string()));
    }

    success(state.directory.register(&id, &request.volunteer_id).await?)
}

/// DELETE /api/events/:id/registrations/:volunteer_id - Unregister a volunteer.
pub async fn unregister_volunteer(
    State(state): State<AppState>,
    Path((id, volunteer_id)): Path<(String, String)>,
) -> ApiResult<Event> {
    success(state.directory.unregister(&id, &volunteer_id).await?)
}

/// GET /api/organizations/:id/events - Events published by an organization.
pub async fn list_organization_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Event>> {
    success(state.directory.list_by_organization(&id).await?)
}

/// GET /api/volunteers/:id/events - Events a volunteer signed up for.
pub async fn list_volunteer_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Event>> {
    success(state.directory.list_by_volunteer(&id).await?)
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
