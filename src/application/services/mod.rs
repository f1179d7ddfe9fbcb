mod advisor;
mod answer;
mod rag;

pub use advisor::{AdvisorService, Faq, FeedbackSection, ResumeFeedback, RoleInfo};
pub use answer::{AnswerGenerator, CONTEXT_SEPARATOR};
pub use rag::{AskOutcome, RagService};
