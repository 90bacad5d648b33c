use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

// Public lookup hierarchy: department -> province -> district.

pub async fn read_departments(State(state): State<AppState>) -> Result<Response, AppError> {
    let departments = state.store.list_departments().await?;
    Ok(success(departments, "Departments retrieved successfully"))
}

#[derive(Deserialize)]
pub struct ProvincesQuery {
    pub department_id: Option<i64>,
}

pub async fn read_provinces(
    State(state): State<AppState>,
    Query(query): Query<ProvincesQuery>,
) -> Result<Response, AppError> {
    let provinces = state.store.list_provinces(query.department_id).await?;
    Ok(success(provinces, "Provinces retrieved successfully"))
}

#[derive(Deserialize)]
pub struct DistrictsQuery {
    pub province_id: Option<i64>,
}

pub async fn read_districts(
    State(state): State<AppState>,
    Query(query): Query<DistrictsQuery>,
) -> Result<Response, AppError> {
    let districts = state.store.list_districts(query.province_id).await?;
    Ok(success(districts, "Districts retrieved successfully"))
}
