use resume_rag::api::{create_router, AppState};
use resume_rag::application::RagService;
use resume_rag::infrastructure::{
    load_corpus, AppConfig, IndexBuilder, OllamaChat, OllamaEmbedding,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,resume_rag=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    let config = AppConfig::load()?;
    let llm = Arc::new(OllamaChat::from_config(&config.config.llm)?);
    info!(
        endpoint = %config.config.llm.endpoint,
        model = %config.config.llm.model,
        "generation oracle configured"
    );

    let mut state = AppState::new(llm, config.clone());

    // Built or loaded before the listener binds.
    let embedding = Arc::new(OllamaEmbedding::from_config(&config.config.embedding));
    let rag_config = &config.config.rag;
    let builder = IndexBuilder::from_config(embedding.clone(), rag_config);
    let store = match &rag_config.corpus_path {
        Some(path) => {
            let corpus = load_corpus(path)?;
            Some(builder.load_or_build(&corpus).await?)
        }
        None => builder.open()?,
    };

    match store {
        Some(store) => {
            let rag = RagService::new(embedding, Arc::new(store), rag_config.top_k);
            info!(documents = rag.document_count(), "vector index ready");
            state = state.with_rag_service(Arc::new(rag));
        }
        None => warn!(
            index = %rag_config.index_path().display(),
            "no index and no CORPUS_PATH; search is disabled"
        ),
    }

    let app = create_router(state);

    let server = &config.config.server;
    let addr = SocketAddr::new(server.host.parse()?, server.port);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
