use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One per (user, event) pair, score 1-5.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub score: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRating {
    pub user_id: i64,
    pub event_id: i64,
    pub score: i32,
    pub comment: Option<String>,
}

impl NewRating {
    pub fn score_in_range(&self) -> bool {
        (1..=5).contains(&self.score)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RatingFilter {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
}
