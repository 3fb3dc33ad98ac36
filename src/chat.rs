//! Upstream chat-completion client for the supportive-chat endpoint.
//!
//! This is thin proxy glue. The client forwards the user's message to an
//! OpenAI-style completion API and falls back to a canned supportive reply
//! when no token is configured or the upstream call fails, so the endpoint
//! stays available either way.

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::ChatConfig;

const SYSTEM_PROMPT: &str = "You are a compassionate, non-judgmental mental health support \
    companion. Provide supportive, empathetic, non-clinical responses. If the user expresses \
    imminent self-harm or danger, respond with a crisis escalation message and provide emergency \
    resources without providing instructions for self-harm.";

const EMPTY_COMPLETION_REPLY: &str =
    "I'm here to listen, but I couldn't form a reply — can you tell me more?";

/// Client for the configured chat-completion upstream.
pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
    api_key: Option<String>,
}

impl ChatClient {
    /// Create a new client, resolving the bearer token from the environment.
    pub fn new(config: ChatConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        if api_key.is_none() {
            warn!(
                var = %config.api_key_env,
                "Upstream API key not set, serving fallback replies"
            );
        }

        Self {
            http: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    /// Whether an upstream token is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Produce a supportive reply for `message`.
    ///
    /// Never fails: an unconfigured or unreachable upstream degrades to the
    /// static fallback reply.
    pub async fn generate_reply(&self, message: &str) -> String {
        let Some(key) = &self.api_key else {
            return fallback_reply(message);
        };

        match self.request_completion(key, message).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Upstream chat completion failed");
                fallback_reply(message)
            }
        }
    }

    async fn request_completion(
        &self,
        key: &str,
        message: &str,
    ) -> std::result::Result<String, reqwest::Error> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages: [
                CompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                CompletionMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let completion: CompletionResponse = self
            .http
            .post(format!("{}/chat/completions", self.config.upstream_url))
            .bearer_auth(key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty());

        Ok(reply.unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_string()))
    }
}

/// Static supportive reply used when the upstream cannot answer.
fn fallback_reply(message: &str) -> String {
    format!(
        "Thanks for sharing. I'm here to listen — you said: \"{}\". How can I support you right now?",
        message
    )
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Deserialize)]
struct CompletionChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured_client() -> ChatClient {
        let config = ChatConfig {
            api_key_env: "MINDCARE_TEST_UNSET_KEY".to_string(),
            ..ChatConfig::default()
        };
        ChatClient::new(config)
    }

    #[test]
    fn test_missing_key_means_unconfigured() {
        let client = unconfigured_client();
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_client_serves_fallback_reply() {
        let client = unconfigured_client();

        let reply = client.generate_reply("I feel anxious today").await;

        assert!(reply.contains("I feel anxious today"));
        assert!(reply.contains("I'm here to listen"));
    }

    #[test]
    fn test_fallback_reply_echoes_the_message() {
        let reply = fallback_reply("hello");
        assert!(reply.contains("\"hello\""));
    }

    #[test]
    fn test_completion_response_tolerates_missing_choices() {
        let completion: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(completion.choices.is_empty());
    }
}
