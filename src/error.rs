//! Error types for the ingestion and retrieval pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document '{0}' produced no text to process")]
    EmptyDocument(String),

    #[error("Knowledge graph extraction failed after {attempts} attempts")]
    ExtractionFailed { attempts: u32 },

    #[error("Could not parse model output: {0}")]
    ParseFailure(#[from] crate::ingestion::extractor::ParseFailure),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Language model call timed out after {0} seconds")]
    LlmTimeout(u64),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Graph store error: {0}")]
    GraphStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<neo4rs::Error> for Error {
    fn from(err: neo4rs::Error) -> Self {
        Error::GraphStore(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for Error {
    fn from(err: qdrant_client::QdrantError) -> Self {
        Error::VectorStore(err.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for Error {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        Error::Embedding(err.to_string())
    }
}
