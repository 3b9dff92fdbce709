//! Hybrid graph + vector RAG pipeline library.
//!
//! This library provides tools to:
//! - Extract entity-relation facts from documents with an LLM
//! - Store extracted facts as a knowledge graph in Neo4j
//! - Chunk documents and enrich chunks with their matching facts
//! - Index enriched chunks in a Qdrant vector collection
//! - Rephrase follow-up questions using conversation history
//! - Answer questions from retrieved context, scoped to chosen documents

pub mod capability;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod integrations;
pub mod prompts;
pub mod retrieval;
pub mod stores;

// Re-export common types
pub use capability::{Embedder, GraphStore, IndexedRecord, LanguageModel, ScoredChunk, VectorStore};
pub use config::Settings;
pub use error::{Error, Result};
pub use ingestion::{IngestionPipeline, JobState};
pub use integrations::{EmbeddingService, GeminiClient};
pub use retrieval::{get_answer, ChatTurn};
pub use stores::{Neo4jStore, QdrantStore};
