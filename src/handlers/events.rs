use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{EventFilter, EventPatch, NewEvent};
use crate::routes::AppState;
use crate::store::StoreError;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct ListEventsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<i64>,
    pub organizer_id: Option<i64>,
}

pub async fn read_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Response, AppError> {
    let filter = EventFilter {
        category_id: query.category_id,
        organizer_id: query.organizer_id,
    };
    let events = state
        .store
        .list_events(filter, super::page(query.offset, query.limit))
        .await?;
    Ok(success(events, "Events retrieved successfully"))
}

pub async fn read_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .get_event(event_id)
        .await
        .map_err(AppError::lookup("Event"))?;
    Ok(success(event, "Event retrieved successfully"))
}

pub async fn create_event(
    State(state): State<AppState>,
    principal: Principal,
    Json(mut new_event): Json<NewEvent>,
) -> Result<Response, AppError> {
    let organizer = match state.store.get_organizer_by_user(principal.user_id).await {
        Ok(organizer) => organizer,
        Err(StoreError::NotFound) => {
            return Err(AppError::ValidationError(
                "User is not an organizer".to_string(),
            ))
        }
        Err(other) => return Err(AppError::DatabaseError(other)),
    };

    policy::authorize(
        &principal,
        Action::CreateEvent {
            organizer: &organizer,
            declared_organizer_id: new_event.organizer_id,
        },
    )?;

    // The owning user always comes from the authenticated profile, whatever
    // the payload declared.
    new_event.organizer_user_id = organizer.user_id;

    let event = state.store.create_event(&new_event).await?;
    Ok(created(event, "Event created successfully"))
}

pub async fn update_event(
    State(state): State<AppState>,
    principal: Principal,
    Path(event_id): Path<i64>,
    Json(patch): Json<EventPatch>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .get_event(event_id)
        .await
        .map_err(AppError::lookup("Event"))?;

    policy::authorize(&principal, Action::UpdateEvent(&event))?;

    let event = state.store.update_event(event_id, &patch).await?;
    Ok(success(event, "Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    principal: Principal,
    Path(event_id): Path<i64>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .get_event(event_id)
        .await
        .map_err(AppError::lookup("Event"))?;

    policy::authorize(&principal, Action::DeleteEvent(&event))?;

    state.store.delete_event(event_id).await?;
    Ok(empty_success("Event deleted successfully"))
}
