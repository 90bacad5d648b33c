use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public contact-us submission; moderated by administrators.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContactMessage {
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPatch {
    pub status: Option<String>,
}

impl ContactPatch {
    pub fn apply(&self, contact: &mut ContactMessage) {
        if let Some(v) = &self.status {
            contact.status = v.clone();
        }
    }
}
