//! OpenAI-compatible chat-completions client.
//!
//! One client serves any provider exposing the `/chat/completions`
//! shape (DeepSeek, OpenAI, Mistral, ...) via a configurable base URL.
//! The API key is wrapped in [`secrecy::SecretString`] and is only
//! exposed when constructing the Authorization header; it never appears
//! in Debug output or tracing logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use tollgate_core::llm::ChatModel;
use tollgate_types::chat::Transcript;
use tollgate_types::llm::LlmError;

/// Client for any OpenAI-compatible chat-completions API.
///
/// Does NOT derive Debug to prevent accidental exposure of internal
/// state including the API key.
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    system_prompt: Option<String>,
}

impl OpenAiCompatClient {
    /// Create a new client.
    ///
    /// `timeout` bounds the whole model call; a stuck upstream turns
    /// into [`LlmError::Timeout`] instead of hanging the user's turn.
    pub fn new(
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Request(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            system_prompt: None,
        })
    }

    /// Create a DeepSeek client with the default timeout of 60 seconds.
    ///
    /// Uses `https://api.deepseek.com/v1` as the base URL.
    pub fn deepseek(api_key: SecretString, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(
            api_key,
            "https://api.deepseek.com/v1",
            model,
            Duration::from_secs(60),
        )
    }

    /// Set the system prompt prepended to every request.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    fn build_messages(&self, user_message: &str, history: &Transcript) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(ref system) = self.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        for entry in history.entries() {
            messages.push(WireMessage {
                role: entry.role.to_string(),
                content: entry.content.clone(),
            });
        }
        messages.push(WireMessage {
            role: "user".to_string(),
            content: user_message.to_string(),
        });
        messages
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

impl ChatModel for OpenAiCompatClient {
    async fn complete(
        &self,
        user_message: &str,
        history: &Transcript,
    ) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.build_messages(user_message, history),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Request(format!("{status}: {body}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Deserialization("response contained no choices".to_string()))
    }
}
