use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::models::NewPurchaseDetail;
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListDetailsQuery {
    pub purchase_id: i64,
}

pub async fn read_purchase_details(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListDetailsQuery>,
) -> Result<Response, AppError> {
    let purchase = state
        .store
        .get_purchase(query.purchase_id)
        .await
        .map_err(AppError::lookup("Purchase"))?;

    policy::authorize(
        &principal,
        Action::ReadOwned {
            owner_id: purchase.user_id,
        },
    )?;

    let details = state.store.list_purchase_details(query.purchase_id).await?;
    Ok(success(details, "Purchase details retrieved successfully"))
}

pub async fn create_purchase_detail(
    State(state): State<AppState>,
    principal: Principal,
    Json(new_detail): Json<NewPurchaseDetail>,
) -> Result<Response, AppError> {
    if new_detail.quantity < 1 {
        return Err(AppError::ValidationError(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let purchase = state
        .store
        .get_purchase(new_detail.purchase_id)
        .await
        .map_err(AppError::lookup("Purchase"))?;

    policy::authorize(
        &principal,
        Action::CreateForUser {
            owner_id: purchase.user_id,
        },
    )?;

    let detail = state.store.create_purchase_detail(&new_detail).await?;
    Ok(created(detail, "Purchase detail created successfully"))
}
