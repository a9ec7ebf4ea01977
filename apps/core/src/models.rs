use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::brain::EmotionScores;

/// Minimum dream length in characters, after trimming.
pub const MIN_DREAM_CHARS: usize = 10;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The unique identifier for the user (UUID).
    pub id: String,
    pub name: String,
    pub email: String,
    /// Never leaves the server.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// How the account was created. Only `local` is issued.
    pub auth_provider: String,
    /// Unix timestamp (milliseconds) of signup.
    pub created_at: i64,
}

/// Public view of a user, as returned by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: i64,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// A stored dream and everything derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dream {
    /// The unique identifier for the dream (UUID).
    pub id: String,
    /// Owner. Only this user can see or patch the dream.
    pub user_id: String,
    pub text: String,
    pub title: String,
    pub summary: String,
    pub keywords: Json<Vec<String>>,
    pub emotions: Json<EmotionScores>,
    /// Unix timestamp (milliseconds) of analysis.
    pub timestamp: i64,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

/// Fields needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields needed to insert a dream.
#[derive(Debug, Clone)]
pub struct NewDream {
    pub user_id: String,
    pub text: String,
    pub title: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub emotions: EmotionScores,
}

// --- Request bodies ---

/// Rejects dream text shorter than [`MIN_DREAM_CHARS`] once trimmed.
pub fn validate_dream_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().chars().count() < MIN_DREAM_CHARS {
        let mut err = ValidationError::new("too_short");
        err.message = Some(
            format!("Dream text must be at least {} characters", MIN_DREAM_CHARS).into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Rejects strings that are empty once trimmed.
pub fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(custom(function = "validate_dream_text"))]
    pub text: String,
}

/// Blank text is answered with an unsuccessful render result instead of
/// field-level validation details.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub dream_text: String,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    #[validate(custom(function = "validate_not_blank", message = "Dream text required"))]
    pub dream_text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RemixRequest {
    #[validate(custom(function = "validate_not_blank", message = "Remix prompt required"))]
    pub prompt: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(custom(function = "validate_not_blank", message = "Name required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password required"))]
    pub password: String,
}
