//! Capability interfaces for the external systems the pipeline depends on.
//!
//! Components receive these as explicit handles instead of touching global
//! clients, so every piece of the pipeline can be exercised against the mock
//! implementations at the bottom of this module.

use async_trait::async_trait;

use crate::ingestion::graph_writer::MergeStatement;
use crate::Result;

/// Single-turn text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Text embedding provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| crate::Error::Embedding("no embedding returned".to_string()))
    }

    /// Dimension of the produced vectors.
    fn dimension(&self) -> usize;
}

/// Record stored in the vector index. `id` is `"{filename}_{index}"`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub source_document: String,
}

/// Ranked search hit returned by the vector store.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub source_document: String,
    pub score: f32,
}

/// Vector index over enriched chunks, filtered by source document.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Write a batch of records; same ids overwrite earlier versions.
    async fn upsert(&self, records: Vec<IndexedRecord>) -> Result<()>;

    /// Nearest-neighbour search restricted to `allowed_sources`, best first.
    async fn search(
        &self,
        embedding: Vec<f32>,
        allowed_sources: &[String],
        limit: u64,
    ) -> Result<Vec<ScoredChunk>>;
}

/// Graph database accepting merge-style (create-if-absent) writes.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn run_merge(&self, stmt: &MergeStatement) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod mocks {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::Error;

    /// Scripted language model: pops one response per call.
    pub struct MockLlm {
        script: Mutex<VecDeque<std::result::Result<String, String>>>,
        calls: AtomicUsize,
    }

    impl MockLlm {
        pub fn script(items: Vec<std::result::Result<String, String>>) -> Self {
            Self {
                script: Mutex::new(items.into()),
                calls: AtomicUsize::new(0),
            }
        }

        /// Model that answers every call with the same text.
        pub fn replying(text: &str) -> Self {
            Self::script(vec![Ok(text.to_string()); 8])
        }

        /// Model that fails every call.
        pub fn failing() -> Self {
            Self::script(vec![Err("simulated model failure".to_string()); 8])
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(msg)) => Err(Error::Llm(msg)),
                None => Err(Error::Llm("mock script exhausted".to_string())),
            }
        }
    }

    /// Deterministic hashed bag-of-words embedder (no network).
    pub struct MockEmbedder {
        dim: usize,
    }

    impl MockEmbedder {
        pub fn new(dim: usize) -> Self {
            Self { dim: dim.max(8) }
        }

        fn embed_one(&self, text: &str) -> Vec<f32> {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};

            let mut vec = vec![0.0f32; self.dim];
            for token in text.split_whitespace() {
                let mut hasher = DefaultHasher::new();
                token.to_lowercase().hash(&mut hasher);
                let idx = (hasher.finish() as usize) % self.dim;
                vec[idx] += 1.0;
            }
            let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in vec.iter_mut() {
                    *v /= norm;
                }
            }
            vec
        }
    }

    #[async_trait]
    impl Embedder for MockEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| self.embed_one(t)).collect())
        }

        fn dimension(&self) -> usize {
            self.dim
        }
    }

    /// In-memory vector store doing real cosine ranking over upserted records.
    pub struct MockVectorStore {
        pub records: Mutex<Vec<IndexedRecord>>,
        pub fail_upsert: bool,
    }

    impl MockVectorStore {
        pub fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail_upsert: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                fail_upsert: true,
            }
        }

        pub fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.is_empty() || a.len() != b.len() {
            return 0.0;
        }
        let mut dot = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;
        for (&x, &y) in a.iter().zip(b.iter()) {
            dot += x * y;
            norm_a += x * x;
            norm_b += y * y;
        }
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }

    #[async_trait]
    impl VectorStore for MockVectorStore {
        async fn upsert(&self, records: Vec<IndexedRecord>) -> Result<()> {
            if self.fail_upsert {
                return Err(Error::VectorStore("simulated write failure".to_string()));
            }
            let mut stored = self.records.lock().unwrap();
            for record in records {
                stored.retain(|r| r.id != record.id);
                stored.push(record);
            }
            Ok(())
        }

        async fn search(
            &self,
            embedding: Vec<f32>,
            allowed_sources: &[String],
            limit: u64,
        ) -> Result<Vec<ScoredChunk>> {
            let stored = self.records.lock().unwrap();
            let mut hits: Vec<ScoredChunk> = stored
                .iter()
                .filter(|r| allowed_sources.contains(&r.source_document))
                .map(|r| ScoredChunk {
                    text: r.text.clone(),
                    source_document: r.source_document.clone(),
                    score: cosine_similarity(&embedding, &r.embedding),
                })
                .collect();
            hits.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            hits.truncate(limit as usize);
            Ok(hits)
        }
    }

    /// Graph store recording every merge statement it receives.
    pub struct MockGraphStore {
        pub merges: Mutex<Vec<MergeStatement>>,
        pub fail: bool,
    }

    impl MockGraphStore {
        pub fn new() -> Self {
            Self {
                merges: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                merges: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn merge_count(&self) -> usize {
            self.merges.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GraphStore for MockGraphStore {
        async fn run_merge(&self, stmt: &MergeStatement) -> Result<()> {
            if self.fail {
                return Err(Error::GraphStore("simulated merge failure".to_string()));
            }
            self.merges.lock().unwrap().push(stmt.clone());
            Ok(())
        }
    }
}
