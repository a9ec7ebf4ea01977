//! Account routes: signup, login and profile.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use super::AppState;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::AppError;
use crate::models::{LoginRequest, NewUser, Profile, SignupRequest, User};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Profile,
}

fn issue(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = state.tokens.issue(&user)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .store
        .create_user(NewUser {
            name: req.name,
            email: req.email,
            password_hash: hash_password(&req.password)?,
        })
        .await?;

    info!(user_id = %user.id, "user signed up");
    Ok(Json(issue(&state, user)?))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .store
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login rejected");
        return Err(invalid_credentials());
    }

    info!(user_id = %user.id, "user logged in");
    Ok(Json(issue(&state, user)?))
}

async fn profile(State(state): State<AppState>, user: AuthUser) -> Result<Json<Profile>, AppError> {
    let found = state
        .store
        .find_user_by_id(user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(found.into()))
}
