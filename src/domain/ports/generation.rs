use crate::domain::{errors::DomainError, Message};
use async_trait::async_trait;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Sends one chat request and returns the complete generated text,
    /// whether the oracle answered in one object or streamed it.
    async fn chat(&self, messages: &[Message], temperature: f32) -> Result<String, DomainError>;

    /// Human-readable oracle name used in error text.
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, DomainError> {
        self.chat(&[Message::user(prompt)], temperature).await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, DomainError> {
        self.chat(&[Message::system(system), Message::user(prompt)], temperature)
            .await
    }
}
