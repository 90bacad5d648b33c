use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration payload. The raw password is hashed before it reaches the
/// store; the role defaults to `buyer`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub first_names: String,
    pub last_names: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub first_names: Option<String>,
    pub last_names: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserPatch {
    pub fn apply(&self, user: &mut User) {
        if let Some(v) = &self.first_names {
            user.first_names = v.clone();
        }
        if let Some(v) = &self.last_names {
            user.last_names = v.clone();
        }
        if let Some(v) = &self.phone {
            user.phone = Some(v.clone());
        }
        if let Some(v) = &self.gender {
            user.gender = Some(v.clone());
        }
        if let Some(v) = &self.avatar_url {
            user.avatar_url = Some(v.clone());
        }
    }
}
