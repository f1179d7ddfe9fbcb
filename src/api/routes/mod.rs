pub mod advisor;
pub mod health;
pub mod rag;

use axum::http::{header, Method};
use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::middleware::request_logger;
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.config.cors.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_v1_routes())
        .layer(axum::middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/suggestions", post(advisor::suggest_roles))
        .route("/role-info", post(advisor::role_info))
        .route("/feedback", post(advisor::resume_feedback))
        .route("/ats-score", post(advisor::ats_score))
        .route("/search", post(rag::search_documents))
        .route("/ask", post(rag::ask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::REQUEST_ID;
    use crate::application::RagService;
    use crate::domain::corpus_from_texts;
    use crate::infrastructure::vector_store::{IndexArtifacts, IndexBuilder};
    use crate::infrastructure::AppConfig;
    use crate::test_support::{KeywordEmbedder, ScriptedGenerator};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state(reply: &str) -> AppState {
        AppState::new(
            Arc::new(ScriptedGenerator::replying(reply)),
            AppConfig::default(),
        )
    }

    async fn indexed_state(reply: &str) -> AppState {
        let dir = TempDir::new().unwrap();
        let embedder = Arc::new(KeywordEmbedder::new());
        let artifacts =
            IndexArtifacts::new(dir.path().join("index.bin"), dir.path().join("metadata.json"));
        let store = IndexBuilder::new(embedder.clone(), artifacts)
            .build(&corpus_from_texts([
                "Python developer with SQL skills",
                "HR manager with recruiting experience",
            ]))
            .await
            .unwrap();

        let rag = RagService::new(embedder, Arc::new(store), 5);
        state(reply).with_rag_service(Arc::new(rag))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let app = create_router(state(""));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID));
    }

    #[tokio::test]
    async fn test_ready_reports_index() {
        let (status, _) = send(create_router(state("")), "GET", "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = send(create_router(indexed_state("").await), "GET", "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["documents"], 2);
    }

    #[tokio::test]
    async fn test_suggestions() {
        let app = create_router(state("**Data Analyst**: SQL heavy"));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/suggestions",
            Some(json!({ "skills": "Python, SQL" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_suggestions"], "**Data Analyst**: SQL heavy");
    }

    #[tokio::test]
    async fn test_empty_input_is_bad_request() {
        let app = create_router(state("unused"));
        let (status, body) =
            send(app, "POST", "/api/v1/feedback", Some(json!({ "resume_text": " " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("resume text"));
    }

    #[tokio::test]
    async fn test_ats_score() {
        let app = create_router(state(""));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/ats-score",
            Some(json!({
                "resume_text": "Built ETL jobs in Python and SQL",
                "keywords": ["python", "SQL", "Kubernetes", "Go"]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 50);
        assert_eq!(body["missing"], json!(["Kubernetes", "Go"]));
    }

    #[tokio::test]
    async fn test_search_without_index() {
        let app = create_router(state(""));
        let (status, _) =
            send(app, "POST", "/api/v1/search", Some(json!({ "query": "data analyst" }))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_search_returns_nearest_first() {
        let app = create_router(indexed_state("").await);
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/search",
            Some(json!({ "query": "data analyst", "limit": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], 0);
        assert_eq!(body[0]["content"], "Python developer with SQL skills");
    }

    #[tokio::test]
    async fn test_ask_with_context() {
        let app = create_router(indexed_state("Try a Data Analyst role.").await);
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/ask",
            Some(json!({ "question": "What role fits a SQL developer?", "top_k": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Try a Data Analyst role.");
        assert_eq!(body["failed"], false);
        assert_eq!(body["context"].as_array().unwrap().len(), 1);
        assert!(body["retrieval_error"].is_null());
    }

    #[tokio::test]
    async fn test_ask_without_index_still_answers() {
        let app = create_router(state("General advice."));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/ask",
            Some(json!({ "question": "What role fits me?" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "General advice.");
        assert!(body["context"].as_array().unwrap().is_empty());
        assert!(body["retrieval_error"].is_string());
    }

    #[tokio::test]
    async fn test_ask_rejects_zero_top_k() {
        let llm = Arc::new(ScriptedGenerator::replying("unused"));
        let app = create_router(AppState::new(llm.clone(), AppConfig::default()));
        let (status, body) = send(
            app,
            "POST",
            "/api/v1/ask",
            Some(json!({ "question": "What role fits me?", "top_k": 0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("top_k"));
        assert!(llm.last_messages().is_empty());
    }
}
