//! Service configuration loaded from environment variables.
//!
//! Every setting has a development-friendly default, so the service starts
//! with no configuration at all: in-memory storage and fallback-only imagery.
//!
//! | Variable                  | Default                          | Description                             |
//! |---------------------------|----------------------------------|-----------------------------------------|
//! | `PORT`                    | `8080`                           | HTTP listen port                        |
//! | `LOG_LEVEL`               | `info`                           | tracing filter                          |
//! | `LOG_FORMAT`              | `pretty`                         | `pretty` or `bunyan`                    |
//! | `DATABASE_URL`            | `sqlite::memory:`                | SQLite URL (memory or file)             |
//! | `TOKEN_SECRET`            | `dev-secret-change-me`           | key material for bearer tokens          |
//! | `IMAGE_API_KEY`           | unset                            | image provider credential               |
//! | `IMAGE_API_PROVIDER`      | `stability`                      | `stability`, `openai` or `replicate`    |
//! | `REPLICATE_MODEL`         | `black-forest-labs/flux-schnell` | model used without a pinned version     |
//! | `REPLICATE_MODEL_VERSION` | unset                            | pinned replicate version                |
//! | `RENDER_RATE_LIMIT`       | `30`                             | provider calls per user per window      |
//! | `RENDER_RATE_WINDOW_SECS` | `60`                             | provider budget window                  |
//! | `PING_MESSAGE`            | `ping`                           | reply of `GET /api/ping`                |
//!
//! Provider endpoints can be redirected with `STABILITY_BASE_URL`,
//! `OPENAI_BASE_URL`, `REPLICATE_BASE_URL` and `FALLBACK_IMAGE_BASE_URL`.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use url::Url;

use crate::imaging::ImageProvider;

pub const DEFAULT_TOKEN_SECRET: &str = "dev-secret-change-me";
pub const DEFAULT_REPLICATE_MODEL: &str = "black-forest-labs/flux-schnell";
pub const DEFAULT_STABILITY_BASE_URL: &str = "https://api.stability.ai";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_REPLICATE_BASE_URL: &str = "https://api.replicate.com";
pub const DEFAULT_FALLBACK_BASE_URL: &str = "https://image.pollinations.ai";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable compact lines.
    Pretty,
    /// Bunyan-compatible JSON lines.
    Bunyan,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "bunyan" | "json" => Ok(LogFormat::Bunyan),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Image generation settings.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Provider credential. `None` means every render uses the fallback.
    pub api_key: Option<String>,
    /// Raw provider name as configured.
    pub provider_name: String,
    pub replicate_model: String,
    pub replicate_version: Option<String>,
    pub stability_base_url: String,
    pub openai_base_url: String,
    pub replicate_base_url: String,
    pub fallback_base_url: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider_name: "stability".to_string(),
            replicate_model: DEFAULT_REPLICATE_MODEL.to_string(),
            replicate_version: None,
            stability_base_url: DEFAULT_STABILITY_BASE_URL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            replicate_base_url: DEFAULT_REPLICATE_BASE_URL.to_string(),
            fallback_base_url: DEFAULT_FALLBACK_BASE_URL.to_string(),
        }
    }
}

impl ImageConfig {
    /// Resolves the configured provider name.
    pub fn provider(&self) -> Result<ImageProvider, crate::error::AppError> {
        self.provider_name.parse()
    }
}

/// Runtime configuration for the service process.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Tracing filter string, e.g. `"d2d_core=debug,info"`.
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: String,
    pub token_secret: String,
    pub image: ImageConfig,
    /// Real provider calls allowed per user within `render_rate_window`.
    pub render_rate_limit: usize,
    pub render_rate_window: Duration,
    pub ping_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            database_url: "sqlite::memory:".to_string(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            image: ImageConfig::default(),
            render_rate_limit: 30,
            render_rate_window: Duration::from_secs(60),
            ping_message: "ping".to_string(),
        }
    }
}

impl Config {
    /// Reads only the logging settings, so the subscriber can be installed
    /// before the rest of the configuration is parsed and validated.
    pub fn logging_from_env() -> (String, LogFormat) {
        let defaults = Config::default();
        (
            env_str("LOG_LEVEL", &defaults.log_level),
            env_parse("LOG_FORMAT", defaults.log_format),
        )
    }

    /// Load configuration from environment variables, applying defaults where
    /// a variable is absent or unparseable.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        let image_defaults = ImageConfig::default();

        let image = ImageConfig {
            api_key: env_opt("IMAGE_API_KEY"),
            provider_name: env_str("IMAGE_API_PROVIDER", &image_defaults.provider_name),
            replicate_model: env_str("REPLICATE_MODEL", &image_defaults.replicate_model),
            replicate_version: env_opt("REPLICATE_MODEL_VERSION"),
            stability_base_url: env_url("STABILITY_BASE_URL", DEFAULT_STABILITY_BASE_URL),
            openai_base_url: env_url("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            replicate_base_url: env_url("REPLICATE_BASE_URL", DEFAULT_REPLICATE_BASE_URL),
            fallback_base_url: env_url("FALLBACK_IMAGE_BASE_URL", DEFAULT_FALLBACK_BASE_URL),
        };

        let (log_level, log_format) = Self::logging_from_env();

        let config = Self {
            port: env_parse("PORT", defaults.port),
            log_level,
            log_format,
            database_url: env_str("DATABASE_URL", &defaults.database_url),
            token_secret: env_str("TOKEN_SECRET", &defaults.token_secret),
            image,
            render_rate_limit: env_parse("RENDER_RATE_LIMIT", defaults.render_rate_limit),
            render_rate_window: Duration::from_secs(env_parse(
                "RENDER_RATE_WINDOW_SECS",
                defaults.render_rate_window.as_secs(),
            )),
            ping_message: env_str("PING_MESSAGE", &defaults.ping_message),
        };

        if config.token_secret == DEFAULT_TOKEN_SECRET {
            warn!("TOKEN_SECRET is not set; using the development secret");
        }
        if let Err(e) = config.image.provider() {
            warn!(error = %e, "image provider not recognized; renders will use the fallback");
        }

        config
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_url(key: &str, default: &str) -> String {
    let Some(raw) = env_opt(key) else {
        return default.to_string();
    };
    match Url::parse(&raw) {
        Ok(_) => raw.trim_end_matches('/').to_string(),
        Err(e) => {
            warn!(variable = key, error = %e, "invalid URL; keeping default");
            default.to_string()
        }
    }
}
