use axum::response::Response;
use serde::Serialize;

use crate::store::Page;
use crate::utils::response::success;

pub mod claims;
pub mod contact;
pub mod event_verifiers;
pub mod events;
pub mod favorites;
pub mod locations;
pub mod lookups;
pub mod organizers;
pub mod purchase_details;
pub mod purchases;
pub mod ratings;
pub mod reports;
pub mod ticket_types;
pub mod tickets;
pub mod users;
pub mod verifiers;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "suyay-api",
    };

    success(payload, "Health check successful")
}

/// Builds a [`Page`] from the optional query params every list endpoint
/// accepts.
fn page(offset: Option<i64>, limit: Option<i64>) -> Page {
    let defaults = Page::default();
    Page {
        offset: offset.unwrap_or(defaults.offset),
        limit: limit.unwrap_or(defaults.limit),
    }
}
