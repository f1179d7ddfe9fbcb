use std::sync::Arc;

use crate::application::{AdvisorService, AnswerGenerator, RagService};
use crate::domain::ports::GenerationService;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<AdvisorService>,
    pub answer_generator: Arc<AnswerGenerator>,
    /// Present once the index has been loaded or built.
    pub rag_service: Option<Arc<RagService>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(llm: Arc<dyn GenerationService>, config: AppConfig) -> Self {
        let temperature = config.config.llm.temperature;
        let advisor = AdvisorService::new(llm.clone(), config.prompts.advisor.clone(), temperature);
        let answer_generator =
            AnswerGenerator::new(llm, config.prompts.rag.answer.clone(), temperature);

        Self {
            advisor: Arc::new(advisor),
            answer_generator: Arc::new(answer_generator),
            rag_service: None,
            config: Arc::new(config),
        }
    }

    pub fn with_rag_service(mut self, service: Arc<RagService>) -> Self {
        self.rag_service = Some(service);
        self
    }
}
