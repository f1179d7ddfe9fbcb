use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::domain::{ports::GenerationService, DomainError, Message};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::llm::stream::{
    collect_text, fragment_from_value, ndjson_fragments, sse_fragments,
};

/// Chat client for Ollama (`/api/chat`) and OpenAI-compatible
/// (`/v1/chat/completions`) endpoints.
pub struct OllamaChat {
    client: Client,
    name: String,
    endpoint: String,
    model: String,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    // Top-level for OpenAI-compatible servers, `options` for native Ollama.
    temperature: f32,
    options: ChatOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

impl OllamaChat {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            name: "Ollama".to_string(),
            endpoint: endpoint.into(),
            model: model.into(),
            stream: true,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, DomainError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::generation(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            name: config.provider.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            stream: config.stream,
        })
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

#[async_trait]
impl GenerationService for OllamaChat {
    async fn chat(&self, messages: &[Message], temperature: f32) -> Result<String, DomainError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            options: ChatOptions { temperature },
            stream: self.stream,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::generation(format!("status {status}: {body}")));
        }

        let text = if is_event_stream(&response) {
            collect_text(sse_fragments(response.bytes_stream())).await?
        } else if self.stream {
            collect_text(ndjson_fragments(response.bytes_stream())).await?
        } else {
            let body: Value = response
                .json()
                .await
                .map_err(|e| DomainError::generation(format!("malformed response: {e}")))?;
            fragment_from_value(&body)?.text
        };
        tracing::debug!(model = %self.model, chars = text.len(), "generation completed");
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/event-stream"))
}
