use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{NewRating, RatingFilter};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListRatingsQuery {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
}

pub async fn read_ratings(
    State(state): State<AppState>,
    Query(query): Query<ListRatingsQuery>,
) -> Result<Response, AppError> {
    let filter = RatingFilter {
        event_id: query.event_id,
        user_id: query.user_id,
    };
    let ratings = state.store.list_ratings(filter).await?;
    Ok(success(ratings, "Ratings retrieved successfully"))
}

pub async fn create_rating(
    State(state): State<AppState>,
    principal: Principal,
    Json(new_rating): Json<NewRating>,
) -> Result<Response, AppError> {
    if !new_rating.score_in_range() {
        return Err(AppError::ValidationError(
            "Score must be between 1 and 5".to_string(),
        ));
    }

    policy::authorize(
        &principal,
        Action::CreateForUser {
            owner_id: new_rating.user_id,
        },
    )?;

    if state
        .store
        .find_rating(new_rating.user_id, new_rating.event_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Rating already exists for this event".to_string(),
        ));
    }

    state
        .store
        .get_event(new_rating.event_id)
        .await
        .map_err(AppError::lookup("Event"))?;

    let rating = state
        .store
        .create_rating(&new_rating)
        .await
        .map_err(AppError::conflict_on_unique(
            "Rating already exists for this event",
        ))?;
    Ok(created(rating, "Rating created successfully"))
}
