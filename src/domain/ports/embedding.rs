use crate::domain::{errors::DomainError, Embedding};
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// One request to the embedding oracle. No retries.
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError>;

    /// Batching hook for index builds. The default issues one `embed` call per
    /// text, in order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn model(&self) -> &str;
}
