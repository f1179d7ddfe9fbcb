use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Dimension mismatch: index has dimension {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::EmbeddingService(msg.into())
    }

    pub fn dimension(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::InternalConsistency(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::GenerationService(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
