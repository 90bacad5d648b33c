use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use crate::auth::policy::{self, Action};
use crate::auth::Principal;
use crate::issuance;
use crate::models::{TicketFilter, TicketPatch};
use crate::routes::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct ListTicketsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub purchase_id: Option<i64>,
    pub user_id: Option<i64>,
}

pub async fn read_tickets(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListTicketsQuery>,
) -> Result<Response, AppError> {
    let filter = TicketFilter {
        purchase_id: query.purchase_id,
        user_id: policy::narrow_ticket_filter(&principal, query.user_id),
    };
    let tickets = state
        .store
        .list_tickets(filter, super::page(query.offset, query.limit))
        .await?;
    Ok(success(tickets, "Tickets retrieved successfully"))
}

pub async fn read_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<i64>,
) -> Result<Response, AppError> {
    let ticket = state
        .store
        .get_ticket(ticket_id)
        .await
        .map_err(AppError::lookup("Ticket"))?;

    let owner_id = policy::ticket_owner(state.store.as_ref(), &ticket).await?;
    policy::authorize(
        &principal,
        Action::ReadTicket {
            purchase_owner_id: owner_id,
        },
    )?;

    Ok(success(ticket, "Ticket retrieved successfully"))
}

/// Gate-scanning lookup. Permission is checked before existence so the
/// endpoint does not confirm which codes exist to unauthorized callers.
pub async fn read_ticket_by_code(
    State(state): State<AppState>,
    principal: Principal,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    policy::authorize(&principal, Action::LookupTicketByCode)?;

    let ticket = state
        .store
        .get_ticket_by_code(&code)
        .await
        .map_err(AppError::lookup("Ticket"))?;
    Ok(success(ticket, "Ticket retrieved successfully"))
}

#[derive(Deserialize)]
pub struct CreateTicketQuery {
    pub purchase_id: i64,
}

pub async fn create_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<CreateTicketQuery>,
) -> Result<Response, AppError> {
    let purchase = state
        .store
        .get_purchase(query.purchase_id)
        .await
        .map_err(AppError::lookup("Purchase"))?;

    policy::authorize(
        &principal,
        Action::CreateTicket {
            purchase_owner_id: purchase.user_id,
        },
    )?;

    let ticket = issuance::issue_ticket(state.store.as_ref(), purchase.id).await?;
    Ok(created(ticket, "Ticket created successfully"))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    principal: Principal,
    Path(ticket_id): Path<i64>,
    Json(patch): Json<TicketPatch>,
) -> Result<Response, AppError> {
    let ticket = state
        .store
        .get_ticket(ticket_id)
        .await
        .map_err(AppError::lookup("Ticket"))?;

    policy::authorize(&principal, Action::ValidateTicket)?;

    if let Some(next) = patch.status {
        if !ticket.status.can_transition_to(next) {
            return Err(AppError::ValidationError(format!(
                "Ticket cannot move from {:?} to {:?}",
                ticket.status, next
            )));
        }
    }

    let ticket = state.store.update_ticket(ticket_id, &patch).await?;
    Ok(success(ticket, "Ticket updated successfully"))
}
