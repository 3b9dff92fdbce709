//! Runtime configuration loaded from environment variables
//!
//! Every tunable has a default so the pipeline can start against a local
//! Qdrant/Neo4j setup with only the API keys provided.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

/// Default chunk window in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;
/// Default attempts for knowledge graph extraction.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default per-call timeout for the language model, seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
/// Header placed above the fact block appended to enriched chunks.
pub const DEFAULT_FACT_HEADER: &str = "Key facts extracted from this document:";

/// Pipeline settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Google API key for the Gemini generation model
    pub google_api_key: String,
    /// Gemini model name
    pub llm_model: String,
    /// OpenAI embedding model name
    pub embedding_model: String,
    /// Qdrant gRPC endpoint
    pub qdrant_url: String,
    /// Qdrant collection holding the chunk records
    pub collection_name: String,
    /// Neo4j bolt endpoint
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    /// Chunk window size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
    /// Extraction retry budget
    pub max_retries: u32,
    /// Per-call language model timeout
    pub llm_timeout: Duration,
    /// Language the final answer is written in
    pub answer_language: String,
    /// Header line above the enrichment fact block
    pub fact_header: String,
}

impl Settings {
    /// Load settings from the environment (`.env` is honored by the binary).
    pub fn from_env() -> Result<Self> {
        let google_api_key = env::var("GOOGLE_API_KEY")
            .map_err(|_| Error::Config("GOOGLE_API_KEY not set".to_string()))?;

        Ok(Self {
            google_api_key,
            llm_model: env_or("LLM_MODEL_NAME", "gemini-1.5-flash"),
            embedding_model: env_or("EMBEDDING_MODEL_NAME", "text-embedding-3-small"),
            qdrant_url: env_or("QDRANT_URL", "http://localhost:6334"),
            collection_name: env_or("VECTOR_COLLECTION_NAME", "cognigraph_rag"),
            neo4j_uri: env_or("NEO4J_URI", "bolt://localhost:7687"),
            neo4j_user: env_or("NEO4J_USERNAME", "neo4j"),
            neo4j_password: env::var("NEO4J_PASSWORD")
                .map_err(|_| Error::Config("NEO4J_PASSWORD not set".to_string()))?,
            chunk_size: env_parse("CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?,
            chunk_overlap: env_parse("CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP)?,
            max_retries: env_parse("EXTRACTION_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            llm_timeout: Duration::from_secs(env_parse(
                "LLM_TIMEOUT_SECS",
                DEFAULT_LLM_TIMEOUT_SECS,
            )?),
            answer_language: env_or("ANSWER_LANGUAGE", "English"),
            fact_header: env_or("FACT_HEADER", DEFAULT_FACT_HEADER),
        })
    }
}

impl Default for Settings {
    /// Defaults used by tests; store endpoints point at localhost.
    fn default() -> Self {
        Self {
            google_api_key: String::new(),
            llm_model: "gemini-1.5-flash".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            qdrant_url: "http://localhost:6334".to_string(),
            collection_name: "cognigraph_rag".to_string(),
            neo4j_uri: "bolt://localhost:7687".to_string(),
            neo4j_user: "neo4j".to_string(),
            neo4j_password: String::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            max_retries: DEFAULT_MAX_RETRIES,
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            answer_language: "English".to_string(),
            fact_header: DEFAULT_FACT_HEADER.to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
