use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::NewFavorite;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
pub struct ListFavoritesQuery {
    pub user_id: i64,
}

pub async fn read_favorites(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListFavoritesQuery>,
) -> Result<Response, AppError> {
    policy::authorize(
        &principal,
        Action::ReadOwned {
            owner_id: query.user_id,
        },
    )?;

    let favorites = state.store.list_favorites(query.user_id).await?;
    Ok(success(favorites, "Favorites retrieved successfully"))
}

pub async fn create_favorite(
    State(state): State<AppState>,
    principal: Principal,
    Json(new_favorite): Json<NewFavorite>,
) -> Result<Response, AppError> {
    policy::authorize(
        &principal,
        Action::CreateForUser {
            owner_id: new_favorite.user_id,
        },
    )?;

    if state
        .store
        .find_favorite(new_favorite.user_id, new_favorite.event_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Event already in favorites".to_string()));
    }

    state
        .store
        .get_event(new_favorite.event_id)
        .await
        .map_err(AppError::lookup("Event"))?;

    // The pair constraint still backstops the pre-check under concurrency.
    let favorite = state
        .store
        .create_favorite(&new_favorite)
        .await
        .map_err(AppError::conflict_on_unique("Event already in favorites"))?;
    Ok(created(favorite, "Favorite created successfully"))
}

pub async fn delete_favorite(
    State(state): State<AppState>,
    principal: Principal,
    Path(favorite_id): Path<i64>,
) -> Result<Response, AppError> {
    let favorite = state
        .store
        .get_favorite(favorite_id)
        .await
        .map_err(AppError::lookup("Favorite"))?;

    policy::authorize(
        &principal,
        Action::DeleteFavorite {
            owner_id: favorite.user_id,
        },
    )?;

    state.store.delete_favorite(favorite_id).await?;
    Ok(empty_success("Favorite removed successfully"))
}
