//! TalkAgain server library logic.
//!
//! Exposes the three provider pass-through endpoints used by the practice
//! client (chat completion, speech synthesis, real-time voice token), plus
//! health and catalog endpoints and static hosting of the built client.

pub mod api;
pub mod api_chat;
pub mod api_realtime;
pub mod api_tts;
pub mod config;

use axum::{
    extract::{DefaultBodyLimit, Request},
    routing::{get, post},
    Extension, Json, Router,
};
use config::Config;
use serde_json::{json, Value};
use std::sync::Arc;
use talkagain_llm::{ChatClient, LlmError};
use talkagain_types::Character;
use talkagain_voice::{RealtimeTokenService, TtsService, VoiceError};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Chat-completion client.
    pub chat_client: Arc<ChatClient>,
    /// Speech-synthesis service.
    pub tts_service: Arc<TtsService>,
    /// Real-time voice token issuer.
    pub realtime_tokens: Arc<RealtimeTokenService>,
    /// Character catalog.
    pub characters: Arc<Vec<Character>>,
    /// Directory for the built browser client, if it should be served.
    pub client_dir: Option<String>,
}

/// Errors building [`AppState`] from configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialise chat client: {0}")]
    Llm(#[from] LlmError),
    #[error("failed to initialise voice services: {0}")]
    Voice(#[from] VoiceError),
}

impl AppState {
    /// Builds the provider clients described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        if config.llm.api_key.trim().is_empty() {
            tracing::warn!("no LLM API key configured; chat and speech requests will fail");
        }
        if !config.realtime.is_configured() {
            tracing::warn!("real-time voice credentials missing; token requests will fail");
        }

        Ok(Self {
            chat_client: Arc::new(ChatClient::new(config.llm.clone())?),
            tts_service: Arc::new(TtsService::new(config.tts.clone())?),
            realtime_tokens: Arc::new(RealtimeTokenService::new(config.realtime.clone())?),
            characters: Arc::new(config.characters.clone()),
            client_dir: Some(config.server.client_dir.clone()),
        })
    }
}

/// Maximum request body size (2 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/characters", get(api::list_characters_handler))
        .route("/api/chat", post(api_chat::chat_handler))
        .route("/api/tts", post(api_tts::tts_handler))
        .route(
            "/api/hume/access-token",
            get(api_realtime::access_token_handler),
        )
        .route("/api/realtime/token", get(api_realtime::access_token_handler));

    let router = match state.client_dir.as_deref() {
        Some(client_dir) if std::path::Path::new(client_dir).join("index.html").exists() => {
            tracing::info!(path = %client_dir, "serving client static files");
            let index = format!("{}/index.html", client_dir);
            router.fallback_service(ServeDir::new(client_dir).fallback(ServeFile::new(index)))
        }
        Some(client_dir) => {
            tracing::info!(path = %client_dir, "client directory not found, skipping static file serving");
            router
        }
        None => router,
    };

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(trace_layer)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
