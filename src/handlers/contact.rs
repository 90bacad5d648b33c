use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{ContactPatch, NewContactMessage};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListContactQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn read_contact_messages(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListContactQuery>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ModerateContact)?;

    let messages = state
        .store
        .list_contact_messages(super::page(query.offset, query.limit))
        .await?;
    Ok(success(messages, "Contact messages retrieved successfully"))
}

pub async fn read_contact_message(
    State(state): State<AppState>,
    principal: Principal,
    Path(contact_id): Path<i64>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ModerateContact)?;

    let message = state
        .store
        .get_contact_message(contact_id)
        .await
        .map_err(AppError::lookup("Contact message"))?;
    Ok(success(message, "Contact message retrieved successfully"))
}

/// Public submission, no principal involved.
pub async fn create_contact_message(
    State(state): State<AppState>,
    Json(new_message): Json<NewContactMessage>,
) -> Result<Response, AppError> {
    let message = state.store.create_contact_message(&new_message).await?;
    Ok(created(message, "Contact message created successfully"))
}

pub async fn update_contact_message(
    State(state): State<AppState>,
    principal: Principal,
    Path(contact_id): Path<i64>,
    Json(patch): Json<ContactPatch>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ModerateContact)?;

    let message = state
        .store
        .update_contact_message(contact_id, &patch)
        .await
        .map_err(AppError::lookup("Contact message"))?;
    Ok(success(message, "Contact message updated successfully"))
}
