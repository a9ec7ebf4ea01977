//! Dream routes: analysis, imagery and the owner's journal.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use super::AppState;
use crate::auth::AuthUser;
use crate::brain::EmotionScores;
use crate::error::AppError;
use crate::imaging::prompt::remix_source;
use crate::imaging::{generate_story, ImageGenResult, StoryResult};
use crate::models::{
    AnalyzeRequest, Dream, NewDream, RemixRequest, RenderRequest, StoryRequest,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/render", post(render))
        .route("/story", post(story))
        .route("/list", get(list))
        .route("/remix/:id", post(remix))
        .route("/:id", get(get_dream))
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub emotions: EmotionScores,
    pub timestamp: i64,
}

impl From<Dream> for AnalyzeResponse {
    fn from(dream: Dream) -> Self {
        Self {
            id: dream.id,
            title: dream.title,
            summary: dream.summary,
            keywords: dream.keywords.0,
            emotions: dream.emotions.0,
            timestamp: dream.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemixResponse {
    pub success: bool,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub dream: Dream,
}

fn dream_not_found() -> AppError {
    AppError::NotFound("Dream not found".to_string())
}

async fn analyze(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let analysis = state.analyzer.analyze(&req.text);
    let dream = state
        .store
        .create_dream(NewDream {
            user_id: user.id().to_string(),
            keywords: analysis.keywords,
            text: analysis.text,
            title: analysis.title,
            summary: analysis.summary,
            emotions: analysis.emotions,
        })
        .await?;

    info!(user_id = %user.id(), dream_id = %dream.id, "dream analyzed");
    Ok(Json(dream.into()))
}

async fn render(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;

    if req.dream_text.trim().is_empty() {
        let result = state.images.render(&req.dream_text, false).await;
        return Ok((StatusCode::BAD_REQUEST, Json(result)).into_response());
    }

    if let Some(id) = &req.id {
        state
            .store
            .get_dream(user.id(), id)
            .await?
            .ok_or_else(dream_not_found)?;
    }

    let allow = state.allow_provider(user.id());
    let result: ImageGenResult = state.images.render(&req.dream_text, allow).await;

    if let (Some(id), Some(url)) = (&req.id, &result.image_url) {
        state.store.set_dream_image(user.id(), id, url).await?;
        info!(user_id = %user.id(), dream_id = %id, "dream image updated");
    }

    Ok(Json(result).into_response())
}

async fn story(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<StoryRequest>, JsonRejection>,
) -> Result<Json<StoryResult>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let result = generate_story(&state.images, &req.dream_text, || {
        state.allow_provider(user.id())
    })
    .await;

    Ok(Json(result))
}

async fn list(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<Dream>>, AppError> {
    let dreams = state.store.list_dreams(user.id()).await?;
    Ok(Json(dreams))
}

async fn get_dream(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Dream>, AppError> {
    let dream = state
        .store
        .get_dream(user.id(), &id)
        .await?
        .ok_or_else(dream_not_found)?;
    Ok(Json(dream))
}

async fn remix(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<RemixRequest>, JsonRejection>,
) -> Result<Json<RemixResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let dream = state
        .store
        .get_dream(user.id(), &id)
        .await?
        .ok_or_else(dream_not_found)?;

    let source = remix_source(&dream.text, &req.prompt);
    let allow = state.allow_provider(user.id());
    let result = state.images.render(&source, allow).await;
    let image_url = result
        .image_url
        .ok_or_else(|| AppError::Internal("Remix produced no image".to_string()))?;

    let dream = state
        .store
        .set_dream_image(user.id(), &id, &image_url)
        .await?
        .ok_or_else(dream_not_found)?;

    info!(user_id = %user.id(), dream_id = %id, "dream remixed");
    Ok(Json(RemixResponse {
        success: true,
        image_url,
        dream,
    }))
}
