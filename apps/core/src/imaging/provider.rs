//! Image provider selection and wire formats.
//!
//! Each provider speaks its own JSON dialect. The request and response
//! structs below only model the fields actually used.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Remote image generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProvider {
    Stability,
    OpenAi,
    Replicate,
}

impl ImageProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageProvider::Stability => "stability",
            ImageProvider::OpenAi => "openai",
            ImageProvider::Replicate => "replicate",
        }
    }
}

impl fmt::Display for ImageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stability" => Ok(ImageProvider::Stability),
            "openai" => Ok(ImageProvider::OpenAi),
            "replicate" => Ok(ImageProvider::Replicate),
            other => Err(AppError::Config(format!(
                "Unsupported image provider: {}",
                other
            ))),
        }
    }
}

// --- Stability ---

pub const STABILITY_ENGINE_PATH: &str =
    "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";

#[derive(Debug, Serialize)]
pub struct StabilityRequest<'a> {
    pub cfg_scale: u32,
    pub height: u32,
    pub width: u32,
    pub steps: u32,
    pub samples: u32,
    pub text_prompts: Vec<TextPrompt<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TextPrompt<'a> {
    pub text: &'a str,
    pub weight: u32,
}

impl<'a> StabilityRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            cfg_scale: 7,
            height: 768,
            width: 1344,
            steps: 30,
            samples: 1,
            text_prompts: vec![TextPrompt {
                text: prompt,
                weight: 1,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StabilityResponse {
    #[serde(default)]
    pub artifacts: Vec<StabilityArtifact>,
}

#[derive(Debug, Deserialize)]
pub struct StabilityArtifact {
    pub base64: Option<String>,
}

impl StabilityResponse {
    /// The first artifact as a PNG data URL.
    pub fn image_url(&self) -> Option<String> {
        self.artifacts
            .first()
            .and_then(|a| a.base64.as_deref())
            .filter(|b64| !b64.is_empty())
            .map(|b64| format!("data:image/png;base64,{}", b64))
    }
}

// --- OpenAI ---

pub const OPENAI_IMAGES_PATH: &str = "/v1/images/generations";
pub const OPENAI_IMAGE_MODEL: &str = "gpt-image-1";

#[derive(Debug, Serialize)]
pub struct OpenAiRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub size: &'a str,
}

impl<'a> OpenAiRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            model: OPENAI_IMAGE_MODEL,
            prompt,
            size: "1024x1024",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenAiResponse {
    #[serde(default)]
    pub data: Vec<OpenAiImage>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiImage {
    pub url: Option<String>,
}

impl OpenAiResponse {
    pub fn image_url(&self) -> Option<String> {
        self.data
            .first()
            .and_then(|d| d.url.clone())
            .filter(|u| !u.is_empty())
    }
}

// --- Replicate ---

#[derive(Debug, Serialize)]
pub struct ReplicateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'a str>,
    pub input: ReplicateInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct ReplicateInput<'a> {
    pub prompt: &'a str,
}

/// Replicate returns either a single URL or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReplicateOutput {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct ReplicateResponse {
    pub output: Option<ReplicateOutput>,
}

impl ReplicateResponse {
    pub fn image_url(&self) -> Option<String> {
        let url = match self.output.as_ref()? {
            ReplicateOutput::Single(url) => url.clone(),
            ReplicateOutput::Many(urls) => urls.first()?.clone(),
        };
        Some(url).filter(|u| !u.is_empty())
    }
}

/// Endpoint path for a replicate prediction.
pub fn replicate_path(model: &str, version: Option<&str>) -> String {
    match version {
        Some(_) => "/v1/predictions".to_string(),
        None => format!("/v1/models/{}/predictions", model),
    }
}
