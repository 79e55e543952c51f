use crate::config::RealtimeConfig;
use crate::error::{provider_message, VoiceError};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
struct TokenBody {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Issues short-lived access tokens for the real-time voice provider.
///
/// The server never tracks or revokes issued tokens; they expire on the
/// provider side.
#[derive(Debug, Clone)]
pub struct RealtimeTokenService {
    http: Client,
    config: RealtimeConfig,
}

impl RealtimeTokenService {
    pub fn new(config: RealtimeConfig) -> Result<Self, VoiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Performs the client-credentials exchange and returns the access token.
    ///
    /// A success response that carries no token is treated as a failure.
    pub async fn fetch_access_token(&self) -> Result<String, VoiceError> {
        if !self.config.is_configured() {
            return Err(VoiceError::Config(
                "real-time voice credentials are not configured (set HUME_API_KEY and HUME_SECRET_KEY)"
                    .to_string(),
            ));
        }

        let credentials = BASE64_STANDARD.encode(format!(
            "{}:{}",
            self.config.api_key, self.config.secret_key
        ));
        let url = format!(
            "{}/oauth2-cc/token",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {}", credentials))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Token(provider_message(status.as_u16(), &body)));
        }

        let body: TokenBody = response
            .json()
            .await
            .map_err(|e| VoiceError::Token(format!("invalid token response: {}", e)))?;

        match body.access_token.filter(|t| !t.trim().is_empty()) {
            Some(token) => {
                tracing::debug!(expires_in = body.expires_in, "issued real-time access token");
                Ok(token)
            }
            None => Err(VoiceError::Token("Failed to fetch access token".to_string())),
        }
    }
}
