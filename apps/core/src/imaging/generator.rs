//! Image generation with provider fallback.
//!
//! One attempt against the configured provider, then a deterministic
//! fallback URL. A render never fails for provider reasons: the only
//! unsuccessful result is empty input.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::prompt::build_prompt;
use super::provider::{
    replicate_path, ImageProvider, OpenAiRequest, OpenAiResponse, ReplicateInput,
    ReplicateRequest, ReplicateResponse, StabilityRequest, StabilityResponse,
    OPENAI_IMAGES_PATH, STABILITY_ENGINE_PATH,
};
use crate::config::ImageConfig;

pub const FALLBACK_WIDTH: u32 = 1344;
pub const FALLBACK_HEIGHT: u32 = 768;

/// Error message for blank input.
pub const EMPTY_TEXT_ERROR: &str = "Dream text required";

/// Reasons a provider call did not produce an image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("no image API key configured")]
    MissingKey,

    #[error("unsupported image provider: {0}")]
    UnsupportedProvider(String),

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: ImageProvider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: ImageProvider,
        status: StatusCode,
        body: String,
    },

    #[error("{provider} returned malformed JSON: {source}")]
    Decode {
        provider: ImageProvider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} returned no image")]
    EmptyResponse(ImageProvider),
}

/// Where a successful image URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Provider(ImageProvider),
    Fallback,
}

/// Outcome of a render, serialized as `{success, imageURL?, error?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenResult {
    pub success: bool,
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub source: Option<ImageSource>,
}

impl ImageGenResult {
    fn image(url: String, source: ImageSource) -> Self {
        Self {
            success: true,
            image_url: Some(url),
            error: None,
            source: Some(source),
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            success: false,
            image_url: None,
            error: Some(message.to_string()),
            source: None,
        }
    }
}

/// Sum over characters of each one's leading UTF-16 code unit.
///
/// Characters outside the BMP contribute their high surrogate, so seeds
/// agree with fallback URLs produced by the web client.
pub fn checksum_seed(text: &str) -> u64 {
    let mut buf = [0u16; 2];
    text.chars()
        .map(|c| u64::from(c.encode_utf16(&mut buf)[0]))
        .sum()
}

/// Deterministic placeholder image for a prompt.
pub fn fallback_url(base: &str, prompt: &str, seed: u64) -> String {
    format!(
        "{}/prompt/{}?width={}&height={}&nologo=true&seed={}",
        base.trim_end_matches('/'),
        urlencoding::encode(prompt),
        FALLBACK_WIDTH,
        FALLBACK_HEIGHT,
        seed
    )
}

/// Provider client. Cheap to share behind an `Arc`.
pub struct ImageGenerator {
    client: Client,
    config: ImageConfig,
}

impl ImageGenerator {
    pub fn new(config: ImageConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ImageConfig) -> Self {
        Self { client, config }
    }

    /// True when a render could reach a real provider.
    pub fn provider_enabled(&self) -> bool {
        self.config.api_key.is_some() && self.config.provider().is_ok()
    }

    /// Render `text`. With `allow_provider` false the provider is skipped
    /// and the fallback is returned directly.
    pub async fn render(&self, text: &str, allow_provider: bool) -> ImageGenResult {
        if text.trim().is_empty() {
            return ImageGenResult::failure(EMPTY_TEXT_ERROR);
        }

        let prompt = build_prompt(text);

        if allow_provider {
            match self.call_provider(&prompt).await {
                Ok((provider, url)) => {
                    info!(%provider, "image generated");
                    return ImageGenResult::image(url, ImageSource::Provider(provider));
                }
                Err(ImageError::MissingKey) => debug!("no image API key; using fallback"),
                Err(e) => warn!(error = %e, "image provider failed; using fallback"),
            }
        } else {
            debug!("provider budget exhausted; using fallback");
        }

        let url = fallback_url(&self.config.fallback_base_url, &prompt, checksum_seed(text));
        ImageGenResult::image(url, ImageSource::Fallback)
    }

    async fn call_provider(&self, prompt: &str) -> Result<(ImageProvider, String), ImageError> {
        let key = self.config.api_key.as_deref().ok_or(ImageError::MissingKey)?;
        let provider = self
            .config
            .provider()
            .map_err(|_| ImageError::UnsupportedProvider(self.config.provider_name.clone()))?;

        let url = match provider {
            ImageProvider::Stability => {
                let endpoint = format!("{}{}", self.config.stability_base_url, STABILITY_ENGINE_PATH);
                let request = self
                    .build_request(&endpoint, key)
                    .header(ACCEPT, "application/json")
                    .json(&StabilityRequest::new(prompt));
                let resp: StabilityResponse = self.send(provider, request).await?;
                resp.image_url()
            }
            ImageProvider::OpenAi => {
                let endpoint = format!("{}{}", self.config.openai_base_url, OPENAI_IMAGES_PATH);
                let request = self
                    .build_request(&endpoint, key)
                    .json(&OpenAiRequest::new(prompt));
                let resp: OpenAiResponse = self.send(provider, request).await?;
                resp.image_url()
            }
            ImageProvider::Replicate => {
                let version = self.config.replicate_version.as_deref();
                let endpoint = format!(
                    "{}{}",
                    self.config.replicate_base_url,
                    replicate_path(&self.config.replicate_model, version)
                );
                let request = self
                    .build_request(&endpoint, key)
                    .header("Prefer", "wait")
                    .json(&ReplicateRequest {
                        version,
                        input: ReplicateInput { prompt },
                    });
                let resp: ReplicateResponse = self.send(provider, request).await?;
                resp.image_url()
            }
        };

        url.map(|u| (provider, u))
            .ok_or(ImageError::EmptyResponse(provider))
    }

    fn build_request(&self, endpoint: &str, key: &str) -> RequestBuilder {
        self.client
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", key))
    }

    async fn send<R: DeserializeOwned>(
        &self,
        provider: ImageProvider,
        request: RequestBuilder,
    ) -> Result<R, ImageError> {
        let res = request
            .send()
            .await
            .map_err(|source| ImageError::Transport { provider, source })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ImageError::Status {
                provider,
                status,
                body,
            });
        }

        res.json::<R>()
            .await
            .map_err(|source| ImageError::Decode { provider, source })
    }
}
