use std::sync::Arc;
use tracing::{instrument, warn};

use crate::domain::{ports::GenerationService, Answer, DomainError};
use crate::infrastructure::config::render;

/// Delimits retrieved documents inside the context block.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Turns retrieved context plus a question into one prompt and asks the
/// generation oracle.
pub struct AnswerGenerator {
    llm: Arc<dyn GenerationService>,
    template: String,
    temperature: f32,
}

impl AnswerGenerator {
    pub fn new(llm: Arc<dyn GenerationService>, template: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            template: template.into(),
            temperature,
        }
    }

    pub fn build_prompt(&self, question: &str, context_chunks: &[String]) -> String {
        let context = context_chunks.join(CONTEXT_SEPARATOR);
        render(&self.template, &[("context", &context), ("question", question)])
    }

    /// Never fails: an oracle error comes back as [`Answer::Failed`].
    #[instrument(skip(self, question, context_chunks), fields(chunks = context_chunks.len()))]
    pub async fn generate_answer(&self, question: &str, context_chunks: &[String]) -> Answer {
        let prompt = self.build_prompt(question, context_chunks);

        match self.llm.complete(&prompt, self.temperature).await {
            Ok(text) => Answer::generated(text),
            Err(e) => {
                warn!(oracle = self.llm.name(), error = %e, "answer generation failed");
                let detail = match e {
                    DomainError::GenerationService(detail) => detail,
                    other => other.to_string(),
                };
                Answer::failed(self.llm.name(), detail)
            }
        }
    }
}
