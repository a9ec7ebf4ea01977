//! # API Module
//!
//! HTTP surface of the service: an axum `Router` over shared `AppState`.
//!
//! ```text
//! /api/ping, /api/health      open
//! /api/auth/{signup,login}    open
//! /api/auth/profile           bearer
//! /api/dream/*                bearer
//! /api/insights/*             bearer
//! ```

pub mod auth;
pub mod dream;
pub mod insights;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::auth::TokenKeys;
use crate::brain::DreamAnalyzer;
use crate::config::Config;
use crate::database::Store;
use crate::imaging::ImageGenerator;
use crate::rate_limiter::RateLimiter;

const LIMITER_PRUNE_INTERVAL: Duration = Duration::from_secs(300);

/// Shared state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub analyzer: Arc<DreamAnalyzer>,
    pub images: Arc<ImageGenerator>,
    pub tokens: TokenKeys,
    pub limiter: Arc<Mutex<RateLimiter>>,
    pub ping_message: Arc<str>,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn Store>) -> Self {
        Self {
            store,
            analyzer: Arc::new(DreamAnalyzer::new()),
            images: Arc::new(ImageGenerator::new(config.image.clone())),
            tokens: TokenKeys::new(&config.token_secret),
            limiter: Arc::new(Mutex::new(RateLimiter::new(
                config.render_rate_limit,
                config.render_rate_window,
            ))),
            ping_message: Arc::from(config.ping_message.as_str()),
        }
    }

    /// Whether the next render for `user_id` may call the provider.
    ///
    /// Without a usable provider no budget is spent: the render falls back
    /// on its own.
    pub fn allow_provider(&self, user_id: &str) -> bool {
        if !self.images.provider_enabled() {
            return true;
        }
        let mut limiter = match self.limiter.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let allowed = limiter.try_acquire(user_id);
        debug!(user_id, allowed, remaining = limiter.remaining(user_id), "provider budget");
        allowed
    }

    /// Periodically forgets users whose provider calls have all expired.
    pub fn spawn_limiter_pruning(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(&self.limiter);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let tracked = {
                    let mut guard = match limiter.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    guard.prune();
                    guard.tracked_users()
                };
                debug!(tracked, "rate limiter pruned");
            }
        })
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/health", get(health))
        .nest("/api/auth", auth::routes())
        .nest("/api/dream", dream::routes())
        .nest("/api/insights", insights::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds and serves until Ctrl-C.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let pruning = state.spawn_limiter_pruning(LIMITER_PRUNE_INTERVAL);

    info!(%addr, "D2D core listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pruning.abort();
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn ping(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": &*state.ping_message }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
