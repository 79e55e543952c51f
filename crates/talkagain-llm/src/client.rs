use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::prompts::system_prompt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use talkagain_types::{ChatRequest, ChatResponse, Usage};

/// Substituted when the provider answers without any completion text.
pub const FALLBACK_REPLY: &str = "I apologize, I need a moment to respond.";

#[derive(Serialize)]
struct ProviderMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    messages: Vec<ProviderMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    config: LlmConfig,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Produces the character's next reply for the given conversation.
    ///
    /// The system prompt is chosen from the coaching flag and the character;
    /// the history is forwarded unchanged after it. An absent or empty
    /// completion yields [`FALLBACK_REPLY`], never an empty message.
    pub async fn reply(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        if self.config.api_key.trim().is_empty() {
            return Err(LlmError::Config(
                "LLM API key is not configured (set OPENAI_API_KEY)".to_string(),
            ));
        }

        let system = system_prompt(request.coaching_enabled, request.character.as_ref());
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ProviderMessage {
            role: "system",
            content: &system,
        });
        messages.extend(request.messages.iter().map(|m| ProviderMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));

        let payload = CompletionPayload {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_body(status.as_u16(), &body));
        }

        let body: CompletionBody = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let message = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        tracing::debug!(
            model = %self.config.model,
            turns = request.messages.len(),
            total_tokens = body.usage.map(|u| u.total_tokens).unwrap_or_default(),
            "chat completion received"
        );

        Ok(ChatResponse {
            message,
            usage: body.usage,
        })
    }
}
