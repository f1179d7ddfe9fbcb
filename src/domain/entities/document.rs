use serde::{Deserialize, Serialize};

/// One corpus entry. `id` is its position in the corpus and is only stable
/// within a single index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: usize,
    pub text: String,
}

impl Document {
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// True when the document carries no indexable text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub document: Document,
    pub distance: f32,
}

/// Assigns positional ids to corpus texts in their given order.
pub fn corpus_from_texts<I, S>(texts: I) -> Vec<Document>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Document::new(i, text))
        .collect()
}
