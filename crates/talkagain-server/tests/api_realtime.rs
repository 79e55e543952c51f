mod common;

use axum::http::StatusCode;
use common::{body_json, get, setup_app, start_upstream, Script};
use serde_json::json;
use talkagain_server::{app, config::Config, AppState};

#[tokio::test]
async fn issues_access_token() {
    let (upstream, seen) = start_upstream(Script::default()).await;

    let response = get(setup_app(&upstream), "/api/hume/access-token").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"accessToken": "rt-token"}));
    assert_eq!(seen.lock().unwrap().token_calls, 1);
}

#[tokio::test]
async fn alias_route_issues_token() {
    let (upstream, _) = start_upstream(Script::default()).await;
    let response = get(setup_app(&upstream), "/api/realtime/token").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_server_error_not_null() {
    let script = Script {
        token_reply: json!({"access_token": null}),
        ..Script::default()
    };
    let (upstream, _) = start_upstream(script).await;

    let response = get(setup_app(&upstream), "/api/hume/access-token").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to fetch access token"})
    );
}

#[tokio::test]
async fn unconfigured_credentials_are_server_error() {
    let mut config = Config::default();
    config.server.client_dir = "does/not/exist".into();
    let router = app(AppState::from_config(&config).unwrap());

    let response = get(router, "/api/hume/access-token").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("HUME_API_KEY"));
}
