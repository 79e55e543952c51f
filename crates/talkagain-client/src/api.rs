use crate::error::ClientError;
use crate::ports::{Backend, TokenSource};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use talkagain_types::{
    AccessTokenResponse, Character, ChatRequest, ChatResponse, ErrorResponse, TtsRequest,
};

/// Timeout for one call to the TalkAgain server.
const SERVER_TIMEOUT: Duration = Duration::from_secs(90);

/// HTTP client for the TalkAgain server endpoints.
#[derive(Debug, Clone)]
pub struct ServerApi {
    http: Client,
    base_url: String,
}

impl ServerApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(SERVER_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/characters`
    pub async fn characters(&self) -> Result<Vec<Character>, ClientError> {
        let response = self.http.get(self.url("/api/characters")).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /api/chat`
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /api/tts`, returning the MP3 bytes.
    pub async fn synthesize(
        &self,
        text: &str,
        character: Option<&Character>,
    ) -> Result<Vec<u8>, ClientError> {
        let body = TtsRequest {
            text: text.to_string(),
            character: character.cloned(),
        };
        let response = self
            .http
            .post(self.url("/api/tts"))
            .json(&body)
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// `GET /api/hume/access-token`
    pub async fn access_token(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .get(self.url("/api/hume/access-token"))
            .send()
            .await?;
        let response = check(response).await?;
        let body: AccessTokenResponse = response.json().await?;
        Ok(body.access_token)
    }
}

/// Turns a non-success response into [`ClientError::Server`], keeping the
/// server's `error` text when the body carries one.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or_else(|_| format!("server returned status {}", status.as_u16()));
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Backend for ServerApi {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        ServerApi::chat(self, request).await
    }

    async fn synthesize(
        &self,
        text: &str,
        character: Option<&Character>,
    ) -> Result<Vec<u8>, ClientError> {
        ServerApi::synthesize(self, text, character).await
    }
}

#[async_trait]
impl TokenSource for ServerApi {
    async fn access_token(&self) -> Result<String, ClientError> {
        ServerApi::access_token(self).await
    }
}
