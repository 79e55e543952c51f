//! TalkAgain server binary.
//!
//! Starts an axum HTTP server with structured logging and graceful shutdown
//! on SIGTERM/SIGINT.

use std::net::SocketAddr;
use talkagain_server::{app, config, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_ENV: &str = "TALKAGAIN_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Picks the config file: first CLI argument, then `TALKAGAIN_CONFIG_PATH`,
/// then `config.toml` in the working directory. Also returns where the path
/// came from, for the startup log.
fn resolve_config_path() -> (String, &'static str) {
    let non_blank = |value: &String| !value.trim().is_empty();

    if let Some(path) = std::env::args().nth(1).filter(non_blank) {
        return (path, "argument");
    }
    match std::env::var(CONFIG_PATH_ENV).ok().filter(non_blank) {
        Some(path) => (path, "environment"),
        None => (DEFAULT_CONFIG_PATH.to_string(), "default"),
    }
}

#[tokio::main]
async fn main() {
    let (config_path, config_source) = resolve_config_path();

    let config = config::load_config(Some(config_path.as_str()))
        .expect("failed to load configuration; the server cannot start without valid config");

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = %config_path,
        characters = config.characters.len(),
        "configuration loaded"
    );

    let state = AppState::from_config(&config).expect("failed to initialise provider clients");
    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting talkagain server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address; is another process using this port?");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("talkagain server shut down");
}

/// Resolves on Ctrl+C, or on SIGTERM where the platform has it, so
/// in-flight provider calls can finish before the listener closes.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "shutting down");
}
