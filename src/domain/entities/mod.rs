mod answer;
mod ats;
mod document;
mod embedding;
mod message;

pub use answer::Answer;
pub use ats::{score_keywords, AtsReport};
pub use document::{corpus_from_texts, Document, RetrievalHit};
pub use embedding::{squared_l2, Embedding};
pub use message::{Message, MessageRole};
