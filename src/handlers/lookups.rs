use axum::extract::State;
use axum::response::Response;

use crate::models::Role;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn read_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    let categories = state.store.list_categories().await?;
    Ok(success(categories, "Categories retrieved successfully"))
}

/// Roles are a closed enumeration, not rows; the endpoint serves the
/// variants so clients can still populate pickers.
pub async fn read_roles() -> Response {
    success(Role::ALL, "Roles retrieved successfully")
}
