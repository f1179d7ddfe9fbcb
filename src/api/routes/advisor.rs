use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::application::services::{ResumeFeedback, RoleInfo};
use crate::domain::{score_keywords, AtsReport, DomainError};

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub skills: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub job_suggestions: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleInfoRequest {
    pub role: String,
    pub skills: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct AtsScoreRequest {
    pub resume_text: String,
    pub keywords: Vec<String>,
}

pub async fn suggest_roles(
    State(state): State<AppState>,
    Json(request): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let job_suggestions = state.advisor.suggest_roles(&request.skills).await?;
    Ok(Json(SuggestionsResponse { job_suggestions }))
}

pub async fn role_info(
    State(state): State<AppState>,
    Json(request): Json<RoleInfoRequest>,
) -> Result<Json<RoleInfo>, ApiError> {
    let info = state.advisor.role_info(&request.role, &request.skills).await?;
    Ok(Json(info))
}

pub async fn resume_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<ResumeFeedback>, ApiError> {
    let feedback = state.advisor.resume_feedback(&request.resume_text).await?;
    Ok(Json(feedback))
}

pub async fn ats_score(Json(request): Json<AtsScoreRequest>) -> Result<Json<AtsReport>, ApiError> {
    if request.resume_text.trim().is_empty() {
        return Err(DomainError::unsupported("no resume text provided").into());
    }
    let report = score_keywords(&request.resume_text, &request.keywords)?;
    tracing::debug!(score = report.score, "ats score computed");
    Ok(Json(report))
}
