//! Embedding and vector indexing of enriched chunks.

use tracing::{info, warn};

use super::chunker::Chunk;
use crate::capability::{Embedder, IndexedRecord, VectorStore};
use crate::{Error, Result};

/// Embed the chunks of one document and write them to the vector store.
///
/// An empty chunk list is an expected branch (blank source document) and
/// returns `Ok(0)`. A store failure is fatal for the document's ingestion
/// run and propagates, so partial indexing is never reported as success.
pub async fn index_chunks(
    chunks: &[Chunk],
    filename: &str,
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
) -> Result<usize> {
    if chunks.is_empty() {
        warn!("No chunks to index for '{}', skipping", filename);
        return Ok(0);
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;
    if embeddings.len() != chunks.len() {
        return Err(Error::Embedding(format!(
            "expected {} embeddings, got {}",
            chunks.len(),
            embeddings.len()
        )));
    }

    let records: Vec<IndexedRecord> = chunks
        .iter()
        .zip(embeddings)
        .enumerate()
        .map(|(i, (chunk, embedding))| IndexedRecord {
            id: format!("{}_{}", filename, i),
            text: chunk.text.clone(),
            embedding,
            source_document: filename.to_string(),
        })
        .collect();

    let count = records.len();
    store.upsert(records).await?;

    info!("Indexed {} chunks for '{}'", count, filename);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::mocks::{MockEmbedder, MockVectorStore};

    fn chunks_for(texts: &[&str], source: &str) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| Chunk {
                text: text.to_string(),
                index,
                source: source.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn empty_chunks_skip_the_store() {
        let store = MockVectorStore::new();
        let embedder = MockEmbedder::new(32);

        let indexed = index_chunks(&[], "a.pdf", &embedder, &store).await.unwrap();

        assert_eq!(indexed, 0);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn records_carry_positional_ids_and_provenance() {
        let store = MockVectorStore::new();
        let embedder = MockEmbedder::new(32);
        let chunks = chunks_for(&["first chunk", "second chunk"], "a.pdf");

        let indexed = index_chunks(&chunks, "a.pdf", &embedder, &store)
            .await
            .unwrap();

        assert_eq!(indexed, 2);
        let records = store.records.lock().unwrap();
        assert_eq!(records[0].id, "a.pdf_0");
        assert_eq!(records[1].id, "a.pdf_1");
        assert!(records.iter().all(|r| r.source_document == "a.pdf"));
        assert!(records.iter().all(|r| !r.embedding.is_empty()));
    }

    #[tokio::test]
    async fn reindexing_overwrites_instead_of_duplicating() {
        let store = MockVectorStore::new();
        let embedder = MockEmbedder::new(32);
        let chunks = chunks_for(&["only chunk"], "a.pdf");

        index_chunks(&chunks, "a.pdf", &embedder, &store).await.unwrap();
        index_chunks(&chunks, "a.pdf", &embedder, &store).await.unwrap();

        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = MockVectorStore::failing();
        let embedder = MockEmbedder::new(32);
        let chunks = chunks_for(&["chunk"], "a.pdf");

        let err = index_chunks(&chunks, "a.pdf", &embedder, &store)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::VectorStore(_)));
    }
}
