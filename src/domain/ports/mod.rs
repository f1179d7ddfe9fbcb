mod embedding;
mod generation;
mod vector_store;

pub use embedding::EmbeddingService;
pub use generation::GenerationService;
pub use vector_store::VectorStore;
