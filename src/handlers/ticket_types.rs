use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{NewTicketType, TicketTypePatch};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct ListTicketTypesQuery {
    pub event_id: Option<i64>,
}

pub async fn read_ticket_types(
    State(state): State<AppState>,
    Query(query): Query<ListTicketTypesQuery>,
) -> Result<Response, AppError> {
    let ticket_types = state.store.list_ticket_types(query.event_id).await?;
    Ok(success(ticket_types, "Ticket types retrieved successfully"))
}

pub async fn read_ticket_type(
    State(state): State<AppState>,
    Path(ticket_type_id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket_type = state
        .store
        .get_ticket_type(ticket_type_id)
        .await
        .map_err(AppError::lookup("Ticket type"))?;
    Ok(success(ticket_type, "Ticket type retrieved successfully"))
}

pub async fn create_ticket_type(
    State(state): State<AppState>,
    principal: Principal,
    Json(new_ticket_type): Json<NewTicketType>,
) -> Result<Response, AppError> {
    if new_ticket_type.capacity < 0 {
        return Err(AppError::ValidationError(
            "Capacity must not be negative".to_string(),
        ));
    }

    let event = state
        .store
        .get_event(new_ticket_type.event_id)
        .await
        .map_err(AppError::lookup("Event"))?;

    policy::authorize(&principal, Action::CreateTicketType(&event))?;

    let ticket_type = state.store.create_ticket_type(&new_ticket_type).await?;
    Ok(created(ticket_type, "Ticket type created successfully"))
}

pub async fn update_ticket_type(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_type_id): Path<i64>,
    Json(patch): Json<TicketTypePatch>,
) -> Result<Response, AppError> {
    let ticket_type = state
        .store
        .get_ticket_type(ticket_type_id)
        .await
        .map_err(AppError::lookup("Ticket type"))?;

    let event = policy::event_for_ticket_type(state.store.as_ref(), ticket_type.event_id).await?;
    policy::authorize(&principal, Action::UpdateTicketType(&event))?;

    let ticket_type = state
        .store
        .update_ticket_type(ticket_type_id, &patch)
        .await?;
    Ok(success(ticket_type, "Ticket type updated successfully"))
}

pub async fn delete_ticket_type(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_type_id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket_type = state
        .store
        .get_ticket_type(ticket_type_id)
        .await
        .map_err(AppError::lookup("Ticket type"))?;

    let event = policy::event_for_ticket_type(state.store.as_ref(), ticket_type.event_id).await?;
    policy::authorize(&principal, Action::DeleteTicketType(&event))?;

    state.store.delete_ticket_type(ticket_type_id).await?;
    Ok(empty_success("Ticket type deleted successfully"))
}
