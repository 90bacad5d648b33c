//! Request authentication. Token issuance and validation internals live
//! outside this service; all the handlers need is a [`Principal`] resolved
//! from the bearer credential on each request.

pub mod policy;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::models::Role;
use crate::routes::AppState;
use crate::store::{Store, StoreError};
use crate::utils::error::AppError;

/// Hashes a registration password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);
    argon2::Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {e}")))
}

/// Authenticated actor: the user behind the credential plus their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Resolves a bearer credential to a [`Principal`].
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Principal, AppError>;
}

/// Production authenticator: opaque API tokens looked up in the store.
pub struct StoreAuthenticator {
    store: Arc<dyn Store>,
}

impl StoreAuthenticator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Authenticator for StoreAuthenticator {
    async fn resolve(&self, token: &str) -> Result<Principal, AppError> {
        let user = self.store.get_user_by_token(token).await.map_err(|e| match e {
            StoreError::NotFound => AppError::AuthError("Invalid credentials".to_string()),
            other => AppError::DatabaseError(other),
        })?;
        Ok(Principal {
            user_id: user.id,
            role: user.role,
        })
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::AuthError("Missing Authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::AuthError("Expected a bearer token".to_string()))?;

        state.authenticator.resolve(token).await
    }
}
