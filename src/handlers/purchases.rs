use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::{NewPurchase, PurchaseFilter};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListPurchasesQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub user_id: Option<i64>,
    pub event_id: Option<i64>,
}

pub async fn read_purchases(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListPurchasesQuery>,
) -> Result<Response, AppError> {
    let filter = PurchaseFilter {
        user_id: policy::narrow_owner_filter(&principal, query.user_id),
        event_id: query.event_id,
    };
    let purchases = state
        .store
        .list_purchases(filter, super::page(query.offset, query.limit))
        .await?;
    Ok(success(purchases, "Purchases retrieved successfully"))
}

pub async fn read_purchase(
    State(state): State<AppState>,
    principal: Principal,
    Path(purchase_id): Path<i64>,
) -> Result<Response, AppError> {
    let purchase = state
        .store
        .get_purchase(purchase_id)
        .await
        .map_err(AppError::lookup("Purchase"))?;

    policy::authorize(
        &principal,
        Action::ReadOwned {
            owner_id: purchase.user_id,
        },
    )?;

    Ok(success(purchase, "Purchase retrieved successfully"))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    principal: Principal,
    Json(new_purchase): Json<NewPurchase>,
) -> Result<Response, AppError> {
    policy::authorize(
        &principal,
        Action::CreateForUser {
            owner_id: new_purchase.user_id,
        },
    )?;

    // The event must exist before money changes hands.
    state
        .store
        .get_event(new_purchase.event_id)
        .await
        .map_err(AppError::lookup("Event"))?;

    let purchase = state.store.create_purchase(&new_purchase).await?;
    Ok(created(purchase, "Purchase created successfully"))
}
