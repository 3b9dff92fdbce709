//! Per-document ingestion orchestration.
//!
//! One [`IngestionPipeline`] is built at process startup with the capability
//! handles and shared by every ingestion run and status check. Each
//! document's progress is tracked in a concurrency-safe job map updated only
//! by the task running that document.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{error, info, warn};

use super::chunker::{chunk_document, enrich_chunks};
use super::extractor::extract_facts;
use super::graph_writer::store_facts;
use super::indexer::index_chunks;
use crate::capability::{Embedder, GraphStore, LanguageModel, VectorStore};
use crate::config::Settings;
use crate::{Error, Result};

/// Lifecycle of one document's ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Parsing,
    Extracting,
    Indexing,
    Done,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "QUEUED",
            JobState::Parsing => "PARSING",
            JobState::Extracting => "EXTRACTING",
            JobState::Indexing => "INDEXING",
            JobState::Done => "DONE",
            JobState::Failed => "FAILED",
        }
    }
}

/// Orchestrates extraction, graph storage, chunking, enrichment and
/// indexing for single documents.
pub struct IngestionPipeline {
    llm: Arc<dyn LanguageModel>,
    graph: Arc<dyn GraphStore>,
    vectors: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    settings: Settings,
    jobs: RwLock<HashMap<String, JobState>>,
}

impl IngestionPipeline {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        graph: Arc<dyn GraphStore>,
        vectors: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        settings: Settings,
    ) -> Self {
        Self {
            llm,
            graph,
            vectors,
            embedder,
            settings,
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Current job state for a document, if it was ever submitted.
    pub fn job_state(&self, filename: &str) -> Option<JobState> {
        self.jobs.read().unwrap().get(filename).copied()
    }

    /// Record that a document is waiting to be processed.
    pub fn mark_queued(&self, filename: &str) {
        self.set_state(filename, JobState::Queued);
    }

    /// Record that a document is being parsed by the external parser.
    pub fn mark_parsing(&self, filename: &str) {
        self.set_state(filename, JobState::Parsing);
    }

    fn set_state(&self, filename: &str, state: JobState) {
        self.jobs
            .write()
            .unwrap()
            .insert(filename.to_string(), state);
    }

    /// Run the full ingestion flow for one parsed document.
    ///
    /// Blank text halts before any store write. Extraction failure degrades
    /// gracefully (the document is indexed unenriched). Graph write errors
    /// are logged and do not stop the run. Indexing failure is fatal and
    /// re-raised to the caller.
    pub async fn process_document(&self, filename: &str, text: &str) -> Result<()> {
        info!("Starting document processing for '{}'", filename);

        if text.trim().is_empty() {
            warn!("Document '{}' has no extractable text, aborting", filename);
            self.set_state(filename, JobState::Failed);
            return Err(Error::EmptyDocument(filename.to_string()));
        }

        self.set_state(filename, JobState::Extracting);
        let facts = match extract_facts(
            text,
            self.llm.as_ref(),
            self.settings.max_retries,
            self.settings.llm_timeout,
        )
        .await
        {
            Ok(facts) => facts,
            Err(err) => {
                warn!(
                    "Graph extraction failed for '{}', continuing without enrichment: {}",
                    filename, err
                );
                Vec::new()
            }
        };

        if let Err(err) = store_facts(&facts, filename, self.graph.as_ref()).await {
            warn!("Graph storage incomplete for '{}': {}", filename, err);
        }

        let chunks = chunk_document(
            text,
            filename,
            self.settings.chunk_size,
            self.settings.chunk_overlap,
        );
        let chunks = enrich_chunks(chunks, &facts, &self.settings.fact_header);

        self.set_state(filename, JobState::Indexing);
        match index_chunks(&chunks, filename, self.embedder.as_ref(), self.vectors.as_ref()).await {
            Ok(count) => {
                info!("Successfully processed and indexed '{}' ({} chunks)", filename, count);
                self.set_state(filename, JobState::Done);
                Ok(())
            }
            Err(err) => {
                error!("Indexing failed for '{}': {}", filename, err);
                self.set_state(filename, JobState::Failed);
                Err(err)
            }
        }
    }
}
