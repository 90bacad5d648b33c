use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{NewOrganizer, OrganizerPatch};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListOrganizersQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn read_organizers(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<ListOrganizersQuery>,
) -> Result<Response, AppError> {
    let organizers = state
        .store
        .list_organizers(super::page(query.offset, query.limit))
        .await?;
    Ok(success(organizers, "Organizers retrieved successfully"))
}

pub async fn read_organizer(
    State(state): State<AppState>,
    _principal: Principal,
    Path(organizer_id): Path<i64>,
) -> Result<Response, AppError> {
    let organizer = state
        .store
        .get_organizer(organizer_id)
        .await
        .map_err(AppError::lookup("Organizer"))?;
    Ok(success(organizer, "Organizer retrieved successfully"))
}

pub async fn create_organizer(
    State(state): State<AppState>,
    _principal: Principal,
    Json(new_organizer): Json<NewOrganizer>,
) -> Result<Response, AppError> {
    let organizer = state
        .store
        .create_organizer(&new_organizer)
        .await
        .map_err(AppError::conflict_on_unique(
            "User already has an organizer profile",
        ))?;
    Ok(created(organizer, "Organizer profile created successfully"))
}

pub async fn update_organizer(
    State(state): State<AppState>,
    principal: Principal,
    Path(organizer_id): Path<i64>,
    Json(patch): Json<OrganizerPatch>,
) -> Result<Response, AppError> {
    let organizer = state
        .store
        .get_organizer(organizer_id)
        .await
        .map_err(AppError::lookup("Organizer"))?;

    policy::authorize(&principal, Action::UpdateOrganizer(&organizer))?;

    let organizer = state.store.update_organizer(organizer_id, &patch).await?;
    Ok(success(organizer, "Organizer updated successfully"))
}
