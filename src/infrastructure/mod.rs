pub mod config;
pub mod corpus;
pub mod embedding;
pub mod llm;
pub mod vector_store;

pub use config::{AppConfig, Config, PromptsConfig};
pub use corpus::load_corpus;
pub use embedding::OllamaEmbedding;
pub use llm::OllamaChat;
pub use vector_store::{FlatIndexStore, IndexArtifacts, IndexBuilder};
