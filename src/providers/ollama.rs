//! Ollama chat API client.
//!
//! Talks to a local Ollama server (`POST {host}/api/chat`) with streaming
//! disabled and returns the assistant message content.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{OllamaConfig, OllamaOptions};
use crate::error::{GlossaError, Result};

use super::{build_prompt, AnswerGenerator, SYSTEM_PROMPT};

/// Answer generator backed by a local Ollama model.
pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: &'a OllamaOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

impl OllamaProvider {
    /// Create a provider from configuration.
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            options: config.options.clone(),
        })
    }

    /// Model used for generation.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            stream: false,
            options: &self.options,
        }
    }
}

fn parse_response(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GlossaError::Provider(format!("Invalid Ollama response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(GlossaError::Provider(format!("Ollama error: {}", error)));
    }

    response
        .message
        .map(|m| m.content)
        .ok_or_else(|| GlossaError::Provider("Ollama response has no message".to_string()))
}

#[async_trait]
impl AnswerGenerator for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, question: &str, context: &str) -> Result<String> {
        let prompt = build_prompt(question, context);
        let started = std::time::Instant::now();

        let response = self
            .client
            .post(self.chat_url())
            .json(&self.request(&prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GlossaError::Provider(format!(
                "Ollama returned HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let answer = parse_response(&body)?;
        tracing::debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ollama answer generated"
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OllamaProvider {
        let config = OllamaConfig {
            host: "http://localhost:11434/".to_string(),
            model: "llama3.2".to_string(),
            ..Default::default()
        };
        OllamaProvider::new(&config).unwrap()
    }

    #[test]
    fn test_chat_url_strips_trailing_slash() {
        assert_eq!(provider().chat_url(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_request_body_shape() {
        let provider = provider();
        let body = serde_json::to_value(provider.request("hola")).unwrap();

        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hola");
        assert!(body["options"].get("temperature").is_some());
    }

    #[test]
    fn test_parse_response_content() {
        let body = r#"{"model":"llama3.2","message":{"role":"assistant","content":"La piel protege."},"done":true}"#;
        assert_eq!(parse_response(body).unwrap(), "La piel protege.");
    }

    #[test]
    fn test_parse_response_error_field() {
        let body = r#"{"error":"model 'x' not found"}"#;
        let err = parse_response(body).unwrap_err();
        assert!(err.to_string().contains("model 'x' not found"));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        let err = parse_response("<html>").unwrap_err();
        assert!(matches!(err, GlossaError::Provider(_)));
    }

    #[test]
    fn test_name_and_model() {
        let provider = provider();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.model(), "llama3.2");
    }
}
