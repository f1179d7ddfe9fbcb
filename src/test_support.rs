//! In-process stand-ins for the oracles, shared by unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::ports::{EmbeddingService, GenerationService};
use crate::domain::{DomainError, Embedding, Message};

const TECH: &[&str] = &["python", "sql", "data", "analyst", "developer", "engineer"];
const PEOPLE: &[&str] = &["hr", "manager", "recruiting", "people", "hiring"];

/// Embeds text as keyword counts over two axes (tech, people) plus a constant
/// component, so related texts land close together.
pub struct KeywordEmbedder {
    calls: AtomicUsize,
    batch_calls: AtomicUsize,
    /// Pads query vectors to a different length after `mismatch_after` calls.
    mismatch_after: Option<usize>,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            mismatch_after: None,
        }
    }

    pub fn mismatching_after(calls: usize) -> Self {
        Self {
            mismatch_after: Some(calls),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn vector_for(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let count = |vocab: &[&str]| words.iter().filter(|w| vocab.contains(w)).count() as f32;
        vec![count(TECH), count(PEOPLE), 1.0]
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let seen = self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = Self::vector_for(text);
        if self.mismatch_after.is_some_and(|limit| seen >= limit) {
            vector.push(0.0);
        }
        Ok(Embedding::new(vector))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn model(&self) -> &str {
        "keyword-test"
    }
}

/// Fails every call, as an unreachable oracle would.
pub struct DownEmbedder;

#[async_trait]
impl EmbeddingService for DownEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
        Err(DomainError::embedding("connection refused"))
    }

    fn model(&self) -> &str {
        "down"
    }
}

/// Replies with a fixed text and records the messages it was sent.
pub struct ScriptedGenerator {
    reply: Result<String, String>,
    pub seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            reply: Err(detail.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn last_messages(&self) -> Vec<Message> {
        self.seen.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    async fn chat(&self, messages: &[Message], _temperature: f32) -> Result<String, DomainError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        self.reply.clone().map_err(DomainError::generation)
    }

    fn name(&self) -> &str {
        "Ollama"
    }
}
