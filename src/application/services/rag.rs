use serde::Serialize;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::application::services::AnswerGenerator;
use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    Answer, DomainError, RetrievalHit,
};

pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

/// An answer plus the context it was generated from.
#[derive(Debug, Clone, Serialize)]
pub struct AskOutcome {
    pub answer: Answer,
    pub context: Vec<RetrievalHit>,
    /// Set when retrieval failed and the question was answered without context.
    pub retrieval_error: Option<String>,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
        }
    }

    pub fn document_count(&self) -> usize {
        self.vector_store.len()
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievalHit>, DomainError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    /// Nearest stored documents to `query`, nearest first. `top_k` above the
    /// corpus size is clamped.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievalHit>, DomainError> {
        if top_k == 0 {
            return Err(DomainError::unsupported("top_k must be greater than zero"));
        }
        if query.trim().is_empty() {
            return Err(DomainError::unsupported("query is empty"));
        }

        let embedding = self.embedding.embed(query).await?;
        if embedding.dimension() != self.vector_store.dimension() {
            return Err(DomainError::dimension(
                self.vector_store.dimension(),
                embedding.dimension(),
            ));
        }

        let hits = self.vector_store.search(&embedding, top_k)?;
        tracing::debug!(hits = hits.len(), "retrieval completed");
        Ok(hits)
    }

    /// Retrieves context for `question` and answers from it. A failed
    /// retrieval is logged and the question is answered with no context.
    #[instrument(skip(self, generator, question))]
    pub async fn ask(
        &self,
        generator: &AnswerGenerator,
        question: &str,
        top_k: Option<usize>,
    ) -> AskOutcome {
        let top_k = top_k.unwrap_or(self.default_top_k);
        let (context, retrieval_error) = match self.retrieve_top_k(question, top_k).await {
            Ok(hits) => (hits, None),
            Err(e) => {
                warn!(error = %e, "retrieval failed, answering without context");
                (Vec::new(), Some(e.to_string()))
            }
        };

        let chunks: Vec<String> = context.iter().map(|h| h.document.text.clone()).collect();
        let answer = generator.generate_answer(question, &chunks).await;

        AskOutcome {
            answer,
            context,
            retrieval_error,
        }
    }
}
