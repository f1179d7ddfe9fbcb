use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    Document, DomainError,
};
use crate::infrastructure::config::RagConfig;
use crate::infrastructure::vector_store::{
    ArtifactState, FlatIndexStore, FlatL2Index, IndexArtifacts, PersistedIndex,
};

/// Loads a persisted index, or builds one from a corpus and persists it.
pub struct IndexBuilder {
    embedding: Arc<dyn EmbeddingService>,
    artifacts: IndexArtifacts,
    batch_size: Option<usize>,
}

impl IndexBuilder {
    pub fn new(embedding: Arc<dyn EmbeddingService>, artifacts: IndexArtifacts) -> Self {
        Self {
            embedding,
            artifacts,
            batch_size: None,
        }
    }

    pub fn from_config(embedding: Arc<dyn EmbeddingService>, config: &RagConfig) -> Self {
        Self::new(embedding, IndexArtifacts::from_config(config)).with_batch_size(config.batch_size)
    }

    pub fn with_batch_size(mut self, batch_size: Option<usize>) -> Self {
        self.batch_size = batch_size.filter(|n| *n > 0);
        self
    }

    /// Returns the persisted store verbatim when both artifacts exist.
    /// Otherwise embeds the whole corpus, persists both artifacts, and returns
    /// the new store.
    #[instrument(skip(self, corpus), fields(documents = corpus.len()))]
    pub async fn load_or_build(&self, corpus: &[Document]) -> Result<FlatIndexStore, DomainError> {
        match self.artifacts.state() {
            ArtifactState::Present => self.load(Some(corpus)),
            ArtifactState::Partial => Err(self.partial_error()),
            ArtifactState::Missing => {
                let store = self.build(corpus).await?;
                let persisted = PersistedIndex {
                    built_at: Utc::now(),
                    model: self.embedding.model().to_string(),
                    index: store.index().clone(),
                };
                self.artifacts.write(&persisted, store.metadata())?;
                info!(
                    path = %self.artifacts.index_path().display(),
                    documents = store.len(),
                    dimension = store.dimension(),
                    "index persisted"
                );
                Ok(store)
            }
        }
    }

    /// Loads the persisted store without a corpus to compare against.
    /// `None` when nothing has been built yet.
    pub fn open(&self) -> Result<Option<FlatIndexStore>, DomainError> {
        match self.artifacts.state() {
            ArtifactState::Present => self.load(None).map(Some),
            ArtifactState::Partial => Err(self.partial_error()),
            ArtifactState::Missing => Ok(None),
        }
    }

    /// Builds a store in memory without touching the artifacts.
    pub async fn build(&self, corpus: &[Document]) -> Result<FlatIndexStore, DomainError> {
        let (index, metadata) = self.embed_corpus(corpus).await?;
        FlatIndexStore::from_parts(index, metadata)
    }

    fn partial_error(&self) -> DomainError {
        DomainError::consistency(format!(
            "only one of {} and {} exists; delete both to rebuild",
            self.artifacts.index_path().display(),
            self.artifacts.metadata_path().display()
        ))
    }

    fn load(&self, corpus: Option<&[Document]>) -> Result<FlatIndexStore, DomainError> {
        let (persisted, metadata) = self.artifacts.read()?;

        if persisted.model != self.embedding.model() {
            warn!(
                stored = %persisted.model,
                current = %self.embedding.model(),
                "persisted index was built with a different embedding model"
            );
        }
        if let Some(corpus) = corpus {
            let current = corpus.iter().map(|d| d.text.as_str());
            if !metadata.iter().map(String::as_str).eq(current) {
                warn!(
                    stored = metadata.len(),
                    current = corpus.len(),
                    "persisted index does not match the current corpus; delete the artifacts to rebuild"
                );
            }
        }

        info!(
            documents = metadata.len(),
            dimension = persisted.index.dimension(),
            built_at = %persisted.built_at,
            "index loaded"
        );
        FlatIndexStore::from_parts(persisted.index, metadata)
    }

    /// Embeds documents in corpus order. The first embedding fixes the index
    /// dimension.
    async fn embed_corpus(
        &self,
        corpus: &[Document],
    ) -> Result<(FlatL2Index, Vec<String>), DomainError> {
        if corpus.is_empty() {
            return Err(DomainError::unsupported("cannot build an index from an empty corpus"));
        }
        if let Some(blank) = corpus.iter().find(|d| d.is_blank()) {
            return Err(DomainError::unsupported(format!(
                "document {} has no text",
                blank.id
            )));
        }

        let texts: Vec<&str> = corpus.iter().map(|d| d.text.as_str()).collect();
        let mut index: Option<FlatL2Index> = None;

        info!(documents = texts.len(), batch_size = ?self.batch_size, "embedding corpus");
        for chunk in texts.chunks(self.batch_size.unwrap_or(1)) {
            let embeddings = match self.batch_size {
                Some(_) => self.embedding.embed_batch(chunk).await?,
                None => vec![self.embedding.embed(chunk[0]).await?],
            };
            if embeddings.len() != chunk.len() {
                return Err(DomainError::consistency(format!(
                    "embedding service returned {} vectors for {} texts",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            for embedding in &embeddings {
                if embedding.dimension() == 0 {
                    return Err(DomainError::embedding("embedding service returned an empty vector"));
                }
                index
                    .get_or_insert_with(|| FlatL2Index::new(embedding.dimension()))
                    .add(embedding)?;
            }
        }

        let index = index.ok_or_else(|| DomainError::consistency("no embeddings produced"))?;
        Ok((index, texts.into_iter().map(String::from).collect()))
    }
}
