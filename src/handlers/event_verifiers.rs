use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::NewEventVerifier;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct ListAssignmentsQuery {
    pub event_id: Option<i64>,
    pub verifier_id: Option<i64>,
}

pub async fn read_event_verifiers(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<ListAssignmentsQuery>,
) -> Result<Response, AppError> {
    let assignments = state
        .store
        .list_event_verifiers(query.event_id, query.verifier_id)
        .await?;
    Ok(success(assignments, "Event verifiers retrieved successfully"))
}

pub async fn create_event_verifier(
    State(state): State<AppState>,
    principal: Principal,
    Json(new_assignment): Json<NewEventVerifier>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .get_event(new_assignment.event_id)
        .await
        .map_err(AppError::lookup("Event"))?;

    policy::authorize(&principal, Action::AssignEventVerifier(&event))?;

    let assignment = state.store.create_event_verifier(&new_assignment).await?;
    Ok(created(assignment, "Event verifier assigned successfully"))
}

pub async fn delete_event_verifier(
    State(state): State<AppState>,
    principal: Principal,
    Path(event_verifier_id): Path<i64>,
) -> Result<Response, AppError> {
    let assignment = state
        .store
        .get_event_verifier(event_verifier_id)
        .await
        .map_err(AppError::lookup("Event verifier"))?;

    let event = policy::event_for_assignment(state.store.as_ref(), assignment.event_id).await?;
    policy::authorize(&principal, Action::RemoveEventVerifier(&event))?;

    state.store.delete_event_verifier(event_verifier_id).await?;
    Ok(empty_success("Event verifier removed successfully"))
}
