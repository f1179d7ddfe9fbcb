mod ollama;
pub mod stream;

pub use ollama::OllamaChat;
