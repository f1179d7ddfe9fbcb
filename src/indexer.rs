use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resume_rag::application::RagService;
use resume_rag::infrastructure::{load_corpus, AppConfig, IndexBuilder, OllamaEmbedding};

const USAGE: &str = "usage: indexer [--corpus PATH] [--query TEXT] [--top-k N]";

#[derive(Debug, Default)]
struct Args {
    corpus: Option<PathBuf>,
    query: Option<String>,
    top_k: Option<usize>,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut args = Self::default();
        while let Some(flag) = raw.next() {
            let mut value = || {
                raw.next()
                    .ok_or_else(|| anyhow::anyhow!("{flag} needs a value\n{USAGE}"))
            };
            match flag.as_str() {
                "--corpus" => args.corpus = Some(value()?.into()),
                "--query" => args.query = Some(value()?),
                "--top-k" => args.top_k = Some(value()?.parse()?),
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                other => anyhow::bail!("unknown argument {other}\n{USAGE}"),
            }
        }
        Ok(args)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indexer=debug,resume_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = AppConfig::load()?;
    let rag_config = &config.config.rag;

    let corpus_path = args
        .corpus
        .or_else(|| rag_config.corpus_path.clone())
        .ok_or_else(|| anyhow::anyhow!("no corpus given; pass --corpus or set CORPUS_PATH"))?;
    let corpus = load_corpus(&corpus_path)?;

    let embedding = Arc::new(OllamaEmbedding::from_config(&config.config.embedding));
    let store = IndexBuilder::from_config(embedding.clone(), rag_config)
        .load_or_build(&corpus)
        .await?;

    let rag = RagService::new(embedding, Arc::new(store), rag_config.top_k);
    info!(
        documents = rag.document_count(),
        index = %rag_config.index_path().display(),
        metadata = %rag_config.metadata_path().display(),
        "index ready"
    );
    println!(
        "{} documents indexed at {}",
        rag.document_count(),
        rag_config.index_path().display()
    );

    if let Some(query) = args.query {
        let top_k = args.top_k.unwrap_or(rag.default_top_k());
        let hits = rag.retrieve_top_k(&query, top_k).await?;
        for (rank, hit) in hits.iter().enumerate() {
            println!(
                "{}. [{}] distance={:.4} {}",
                rank + 1,
                hit.document.id,
                hit.distance,
                hit.document.text
            );
        }
    }

    Ok(())
}
