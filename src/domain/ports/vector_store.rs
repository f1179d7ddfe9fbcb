use crate::domain::{errors::DomainError, Embedding, RetrievalHit};

/// Read side of a built vector index.
///
/// Implementations are immutable once constructed and must be safe for
/// concurrent searches.
pub trait VectorStore: Send + Sync {
    fn dimension(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nearest stored documents to `query`, ascending by distance. `top_k`
    /// larger than the store is clamped.
    fn search(&self, query: &Embedding, top_k: usize) -> Result<Vec<RetrievalHit>, DomainError>;
}
