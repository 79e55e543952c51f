#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use talkagain_server::{app, config::Config, AppState};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Scripted behaviour of the fake upstream providers.
#[derive(Clone)]
pub struct Script {
    pub chat_status: StatusCode,
    pub chat_reply: Value,
    pub tts_status: StatusCode,
    pub token_status: StatusCode,
    pub token_reply: Value,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            chat_status: StatusCode::OK,
            chat_reply: json!({
                "choices": [{"message": {"role": "assistant", "content": "*shrugs* Hi."}}],
                "usage": {"prompt_tokens": 20, "completion_tokens": 3, "total_tokens": 23}
            }),
            tts_status: StatusCode::OK,
            token_status: StatusCode::OK,
            token_reply: json!({"access_token": "rt-token", "expires_in": 1800}),
        }
    }
}

/// Requests the fake upstream received.
#[derive(Default)]
pub struct Seen {
    pub chat: Vec<Value>,
    pub tts: Vec<Value>,
    pub token_calls: usize,
}

#[derive(Clone)]
struct Upstream {
    script: Script,
    seen: Arc<Mutex<Seen>>,
}

async fn chat(State(up): State<Upstream>, Json(body): Json<Value>) -> Response {
    up.seen.lock().unwrap().chat.push(body);
    (up.script.chat_status, Json(up.script.chat_reply.clone())).into_response()
}

async fn speech(State(up): State<Upstream>, Json(body): Json<Value>) -> Response {
    up.seen.lock().unwrap().tts.push(body);
    if up.script.tts_status.is_success() {
        ([("content-type", "audio/mpeg")], b"ID3fake-mp3".to_vec()).into_response()
    } else {
        (
            up.script.tts_status,
            Json(json!({"error": {"message": "synthesis quota exhausted"}})),
        )
            .into_response()
    }
}

async fn token(State(up): State<Upstream>) -> Response {
    up.seen.lock().unwrap().token_calls += 1;
    (up.script.token_status, Json(up.script.token_reply.clone())).into_response()
}

/// Starts fake LLM, synthesis, and token providers on one local port.
pub async fn start_upstream(script: Script) -> (String, Arc<Mutex<Seen>>) {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let state = Upstream {
        script,
        seen: seen.clone(),
    };
    let router = Router::new()
        .route("/chat/completions", post(chat))
        .route("/audio/speech", post(speech))
        .route("/oauth2-cc/token", post(token))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{}", addr), seen)
}

/// Builds the server router wired to the given upstream base URL.
pub fn setup_app(upstream: &str) -> axum::Router {
    let mut config = Config::default();
    config.llm.base_url = upstream.to_string();
    config.llm.api_key = "sk-test".into();
    config.tts.base_url = upstream.to_string();
    config.tts.api_key = "sk-test".into();
    config.realtime.base_url = upstream.to_string();
    config.realtime.api_key = "hume-key".into();
    config.realtime.secret_key = "hume-secret".into();

    let mut state = AppState::from_config(&config).unwrap();
    state.client_dir = None;
    app(state)
}

pub async fn post_json(app: axum::Router, uri: &str, body: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
