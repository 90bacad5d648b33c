use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{NewReport, ReportPatch};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListReportsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub user_id: Option<i64>,
}

pub async fn read_reports(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListReportsQuery>,
) -> Result<Response, AppError> {
    let user_id = policy::narrow_owner_filter(&principal, query.user_id);
    let reports = state
        .store
        .list_reports(user_id, super::page(query.offset, query.limit))
        .await?;
    Ok(success(reports, "Reports retrieved successfully"))
}

pub async fn read_report(
    State(state): State<AppState>,
    principal: Principal,
    Path(report_id): Path<i64>,
) -> Result<Response, AppError> {
    let report = state
        .store
        .get_report(report_id)
        .await
        .map_err(AppError::lookup("Report"))?;

    policy::authorize(
        &principal,
        Action::ReadOwned {
            owner_id: report.user_id,
        },
    )?;

    Ok(success(report, "Report retrieved successfully"))
}

pub async fn create_report(
    State(state): State<AppState>,
    principal: Principal,
    Json(new_report): Json<NewReport>,
) -> Result<Response, AppError> {
    policy::authorize(
        &principal,
        Action::CreateForUser {
            owner_id: new_report.user_id,
        },
    )?;

    let report = state.store.create_report(&new_report).await?;
    Ok(created(report, "Report created successfully"))
}

pub async fn update_report(
    State(state): State<AppState>,
    principal: Principal,
    Path(report_id): Path<i64>,
    Json(patch): Json<ReportPatch>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::ModerateReports)?;

    let report = state
        .store
        .update_report(report_id, &patch)
        .await
        .map_err(AppError::lookup("Report"))?;
    Ok(success(report, "Report updated successfully"))
}
