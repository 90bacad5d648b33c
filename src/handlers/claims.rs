use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{ClaimPatch, NewClaim};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListClaimsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn read_claims(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListClaimsQuery>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ModerateClaims)?;

    let claims = state
        .store
        .list_claims(super::page(query.offset, query.limit))
        .await?;
    Ok(success(claims, "Claims retrieved successfully"))
}

pub async fn read_claim(
    State(state): State<AppState>,
    principal: Principal,
    Path(claim_id): Path<i64>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ModerateClaims)?;

    let claim = state
        .store
        .get_claim(claim_id)
        .await
        .map_err(AppError::lookup("Claim"))?;
    Ok(success(claim, "Claim retrieved successfully"))
}

/// Complaint-book entries can be filed by anyone, authenticated or not.
pub async fn create_claim(
    State(state): State<AppState>,
    Json(new_claim): Json<NewClaim>,
) -> Result<Response, AppError> {
    let claim = state.store.create_claim(&new_claim).await?;
    Ok(created(claim, "Claim created successfully"))
}

pub async fn update_claim(
    State(state): State<AppState>,
    principal: Principal,
    Path(claim_id): Path<i64>,
    Json(patch): Json<ClaimPatch>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ModerateClaims)?;

    let claim = state
        .store
        .update_claim(claim_id, &patch)
        .await
        .map_err(AppError::lookup("Claim"))?;
    Ok(success(claim, "Claim updated successfully"))
}
