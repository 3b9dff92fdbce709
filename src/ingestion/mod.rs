//! Document ingestion: fact extraction, graph storage, chunking,
//! enrichment and vector indexing.

pub mod chunker;
pub mod extractor;
pub mod fact;
pub mod graph_writer;
pub mod indexer;
pub mod pipeline;

pub use chunker::{chunk_document, enrich_chunks, split_text, Chunk};
pub use extractor::{extract_facts, parse_fact_payload, ParseFailure};
pub use fact::{EntityLabel, Fact};
pub use graph_writer::{store_facts, MergeStatement};
pub use indexer::index_chunks;
pub use pipeline::{IngestionPipeline, JobState};
