use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::{hash_password, Principal};
use crate::models::{NewUser, UserPatch};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// Public registration. The raw password never reaches the store.
pub async fn register_user(
    State(state): State<AppState>,
    Json(mut new_user): Json<NewUser>,
) -> Result<Response, AppError> {
    if new_user.email.trim().is_empty() || !new_user.email.contains('@') {
        return Err(AppError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }
    if new_user.password.is_empty() {
        return Err(AppError::ValidationError(
            "Password must not be empty".to_string(),
        ));
    }

    let password_hash = hash_password(&new_user.password)?;
    new_user.password.clear();

    let user = state
        .store
        .create_user(&new_user, &password_hash)
        .await
        .map_err(AppError::conflict_on_unique("Email already registered"))?;

    Ok(created(user, "User registered successfully"))
}

#[derive(Deserialize)]
pub struct ListUsersQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn read_users(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListUsersQuery>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ListUsers)?;

    let users = state
        .store
        .list_users(super::page(query.offset, query.limit))
        .await?;
    Ok(success(users, "Users retrieved successfully"))
}

pub async fn read_me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Response, AppError> {
    let user = state
        .store
        .get_user(principal.user_id)
        .await
        .map_err(AppError::lookup("User"))?;
    Ok(success(user, "Profile retrieved successfully"))
}

pub async fn read_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ReadUser(user_id))?;

    let user = state
        .store
        .get_user(user_id)
        .await
        .map_err(AppError::lookup("User"))?;
    Ok(success(user, "User retrieved successfully"))
}

pub async fn update_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(user_id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::UpdateUser(user_id))?;

    let user = state
        .store
        .update_user(user_id, &patch)
        .await
        .map_err(AppError::lookup("User"))?;
    Ok(success(user, "User updated successfully"))
}
