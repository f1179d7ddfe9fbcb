use serde::Deserialize;
use std::path::Path;

use crate::domain::{corpus_from_texts, Document, DomainError};

#[derive(Debug, Deserialize)]
struct CorpusRecord {
    clean_text: String,
}

/// Reads a resume corpus.
///
/// `.jsonl` files hold one object per line with a `clean_text` field; any
/// other file is plain text with one document per non-empty line.
pub fn load_corpus(path: &Path) -> Result<Vec<Document>, DomainError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DomainError::storage(format!("failed to read {}: {e}", path.display())))?;

    let texts = if path.extension().is_some_and(|ext| ext == "jsonl") {
        parse_jsonl(&raw)?
    } else {
        raw.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    };

    tracing::info!(path = %path.display(), documents = texts.len(), "corpus loaded");
    Ok(corpus_from_texts(texts))
}

fn parse_jsonl(raw: &str) -> Result<Vec<String>, DomainError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<CorpusRecord>(line)
                .map(|record| record.clean_text)
                .map_err(|e| DomainError::unsupported(format!("corpus line {}: {e}", n + 1)))
        })
        .collect()
}
