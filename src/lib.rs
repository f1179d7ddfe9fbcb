//! Resume retrieval and career-advice service: a flat L2 index over resume
//! embeddings, answer generation through a local Ollama model, and the HTTP
//! API in front of both.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;
