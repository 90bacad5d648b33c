use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub total_amount: Decimal,
    pub purchase_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchase {
    pub event_id: i64,
    pub user_id: i64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PurchaseFilter {
    pub user_id: Option<i64>,
    pub event_id: Option<i64>,
}

/// Purchase line item: quantity of one ticket type at the price in force.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseDetail {
    pub id: i64,
    pub purchase_id: i64,
    pub ticket_type_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPurchaseDetail {
    pub purchase_id: i64,
    pub ticket_type_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}
