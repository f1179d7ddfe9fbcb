use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Vector index is not loaded")]
    IndexUnavailable,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(DomainError::UnsupportedInput(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(DomainError::DimensionMismatch { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Domain(DomainError::EmbeddingService(_))
            | Self::Domain(DomainError::GenerationService(_)) => StatusCode::BAD_GATEWAY,
            Self::Domain(DomainError::InternalConsistency(_))
            | Self::Domain(DomainError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IndexUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(DomainError::unsupported("empty")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DomainError::embedding("down")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(DomainError::consistency("misaligned")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(ApiError::IndexUnavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
