//! Command-line entry point: ingest documents and query them.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cognigraph::retrieval::ChatTurn;
use cognigraph::{
    get_answer, Embedder, EmbeddingService, GeminiClient, IngestionPipeline, Neo4jStore,
    QdrantStore, Settings,
};

#[derive(Parser)]
#[command(name = "cognigraph")]
#[command(about = "Hybrid graph + vector RAG over your documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a knowledge graph from a document and index its chunks
    Ingest {
        /// Path to a plain-text or markdown document
        file: PathBuf,
    },
    /// Ask a question over previously ingested documents
    Query {
        /// The question to answer
        question: String,

        /// Filenames to search in (at least one)
        #[arg(long = "file", required = true)]
        files: Vec<String>,

        /// Chat history as a JSON array of {"role", "content"} turns
        #[arg(long)]
        history: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cognigraph=info".parse()?))
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let llm = Arc::new(GeminiClient::new(
        settings.google_api_key.clone(),
        &settings.llm_model,
    )?);
    let embedder = Arc::new(EmbeddingService::new(&settings.embedding_model)?);
    let vectors = Arc::new(QdrantStore::new(
        &settings.qdrant_url,
        &settings.collection_name,
        embedder.dimension(),
    )?);
    vectors.init_collection().await?;

    match cli.command {
        Command::Ingest { file } => {
            let graph = Arc::new(
                Neo4jStore::new(
                    &settings.neo4j_uri,
                    &settings.neo4j_user,
                    &settings.neo4j_password,
                )
                .await?,
            );

            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());

            let pipeline =
                IngestionPipeline::new(llm, graph, vectors, embedder, settings);

            pipeline.mark_parsing(&filename);
            let text = tokio::fs::read_to_string(&file).await?;

            pipeline.process_document(&filename, &text).await?;
            info!("Ingestion of '{}' finished", filename);

            if let Some(state) = pipeline.job_state(&filename) {
                println!("{}: {}", filename, state.as_str());
            }
        }
        Command::Query {
            question,
            files,
            history,
        } => {
            let history: Vec<ChatTurn> = match history {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            };

            let answer = get_answer(
                &question,
                &files,
                &history,
                llm.as_ref(),
                vectors.as_ref(),
                embedder.as_ref(),
                &settings,
            )
            .await?;

            println!("{}", answer);
        }
    }

    Ok(())
}
