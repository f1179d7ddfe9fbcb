mod ollama;

pub use ollama::OllamaEmbedding;
