use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{NewVerifier, VerifierPatch};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListVerifiersQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn read_verifiers(
    State(state): State<AppState>,
    _principal: Principal,
    Query(query): Query<ListVerifiersQuery>,
) -> Result<Response, AppError> {
    let verifiers = state
        .store
        .list_verifiers(super::page(query.offset, query.limit))
        .await?;
    Ok(success(verifiers, "Verifiers retrieved successfully"))
}

pub async fn read_verifier(
    State(state): State<AppState>,
    _principal: Principal,
    Path(verifier_id): Path<i64>,
) -> Result<Response, AppError> {
    let verifier = state
        .store
        .get_verifier(verifier_id)
        .await
        .map_err(AppError::lookup("Verifier"))?;
    Ok(success(verifier, "Verifier retrieved successfully"))
}

pub async fn create_verifier(
    State(state): State<AppState>,
    _principal: Principal,
    Json(new_verifier): Json<NewVerifier>,
) -> Result<Response, AppError> {
    let verifier = state
        .store
        .create_verifier(&new_verifier)
        .await
        .map_err(AppError::conflict_on_unique(
            "User already has a verifier profile",
        ))?;
    Ok(created(verifier, "Verifier profile created successfully"))
}

pub async fn update_verifier(
    State(state): State<AppState>,
    principal: Principal,
    Path(verifier_id): Path<i64>,
    Json(patch): Json<VerifierPatch>,
) -> Result<Response, AppError> {
    let verifier = state
        .store
        .get_verifier(verifier_id)
        .await
        .map_err(AppError::lookup("Verifier"))?;

    policy::authorize(
        &principal,
        Action::UpdateVerifier {
            profile_user_id: verifier.user_id,
        },
    )?;

    let verifier = state.store.update_verifier(verifier_id, &patch).await?;
    Ok(success(verifier, "Verifier updated successfully"))
}
