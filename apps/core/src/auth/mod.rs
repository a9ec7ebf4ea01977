//! # Auth Module
//!
//! Local email/password accounts and sealed bearer tokens.

pub mod password;
pub mod token;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use crate::api::AppState;
use crate::error::AppError;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Authenticated caller, extracted from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.sub
    }
}

/// Pulls the token out of a `Bearer` authorization header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let token = bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = state.tokens.verify(token)?;

        // A sealed token can outlive its account, e.g. across an in-memory restart.
        if state.store.find_user_by_id(&claims.sub).await?.is_none() {
            warn!(user_id = %claims.sub, "token for unknown user");
            return Err(AppError::Unauthorized("Unknown user".to_string()));
        }

        Ok(AuthUser(claims))
    }
}
