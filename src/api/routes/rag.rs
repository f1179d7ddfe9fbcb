use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::application::AskOutcome;
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchHitResponse {
    pub id: usize,
    pub content: String,
    pub distance: f32,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Display text; carries the error string when generation failed.
    pub answer: String,
    pub failed: bool,
    pub context: Vec<SearchHitResponse>,
    pub retrieval_error: Option<String>,
}

impl From<AskOutcome> for AskResponse {
    fn from(outcome: AskOutcome) -> Self {
        Self {
            failed: outcome.answer.is_failed(),
            answer: outcome.answer.into_text(),
            context: outcome
                .context
                .into_iter()
                .map(|hit| SearchHitResponse {
                    id: hit.document.id,
                    content: hit.document.text,
                    distance: hit.distance,
                })
                .collect(),
            retrieval_error: outcome.retrieval_error,
        }
    }
}

pub async fn search_documents(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchHitResponse>>, ApiError> {
    let rag = state.rag_service.as_ref().ok_or(ApiError::IndexUnavailable)?;
    let top_k = request.limit.unwrap_or_else(|| rag.default_top_k());

    let hits = rag.retrieve_top_k(&request.query, top_k).await?;
    Ok(Json(
        hits.into_iter()
            .map(|hit| SearchHitResponse {
                id: hit.document.id,
                content: hit.document.text,
                distance: hit.distance,
            })
            .collect(),
    ))
}

pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if request.question.trim().is_empty() {
        return Err(DomainError::unsupported("question is empty").into());
    }
    if request.top_k == Some(0) {
        return Err(DomainError::unsupported("top_k must be greater than zero").into());
    }

    let outcome = match &state.rag_service {
        Some(rag) => {
            rag.ask(&state.answer_generator, &request.question, request.top_k)
                .await
        }
        None => {
            tracing::warn!("no index loaded, answering without context");
            AskOutcome {
                answer: state
                    .answer_generator
                    .generate_answer(&request.question, &[])
                    .await,
                context: Vec::new(),
                retrieval_error: Some(ApiError::IndexUnavailable.to_string()),
            }
        }
    };

    Ok(Json(AskResponse::from(outcome)))
}
