use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One per (user, event) pair; the store enforces the uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFavorite {
    pub user_id: i64,
    pub event_id: i64,
}
