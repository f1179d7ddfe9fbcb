use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// Client for Ollama's `/api/embeddings` endpoint.
pub struct OllamaEmbedding {
    client: Client,
    endpoint: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Option<Vec<f32>>,
}

impl OllamaEmbedding {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(&config.endpoint, &config.model)
    }
}

#[async_trait]
impl EmbeddingService for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| DomainError::embedding(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::embedding(format!("status {status}: {body}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| DomainError::embedding(format!("invalid response: {e}")))?;

        match parsed.embedding {
            Some(vector) if !vector.is_empty() => Ok(Embedding::new(vector)),
            Some(_) => Err(DomainError::embedding("response carried an empty embedding")),
            None => Err(DomainError::embedding("response missing `embedding` field")),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
