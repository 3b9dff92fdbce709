//! Vector index backed by Qdrant.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    r#match::MatchValue, CreateCollectionBuilder, Distance, FieldCondition, Filter, Match,
    PointStruct, RepeatedStrings, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::capability::{IndexedRecord, ScoredChunk, VectorStore};
use crate::Result;

/// Vector store over enriched chunks, one collection for all documents.
///
/// Qdrant point ids must be UUIDs, so each record's string id is mapped to a
/// UUIDv5 of itself. The mapping is deterministic, which is what makes
/// re-ingesting a document overwrite its old points instead of duplicating
/// them. The original id is kept in the payload as `chunk_id`.
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantStore {
    /// Connect to a Qdrant server.
    pub fn new(url: &str, collection: &str, dimension: usize) -> Result<Self> {
        let client = Qdrant::from_url(url).build()?;

        Ok(Self {
            client,
            collection: collection.to_string(),
            dimension,
        })
    }

    /// Create the collection if it doesn't exist.
    pub async fn init_collection(&self) -> Result<()> {
        let collections = self.client.list_collections().await?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            info!("Creating collection '{}'", self.collection);

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await?;

            info!("Collection created successfully");
        } else {
            debug!("Collection '{}' already exists", self.collection);
        }

        Ok(())
    }

    fn point_id(chunk_id: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes()).to_string()
    }

    fn source_filter(allowed_sources: &[String]) -> Filter {
        Filter::must([FieldCondition {
            key: "source_document".to_string(),
            r#match: Some(Match {
                match_value: Some(MatchValue::Keywords(RepeatedStrings {
                    strings: allowed_sources.to_vec(),
                })),
            }),
            ..Default::default()
        }
        .into()])
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn upsert(&self, records: Vec<IndexedRecord>) -> Result<()> {
        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|record| {
                let mut payload: HashMap<String, QdrantValue> = HashMap::new();
                payload.insert("chunk_id".into(), record.id.clone().into());
                payload.insert("text".into(), record.text.into());
                payload.insert("source_document".into(), record.source_document.into());

                PointStruct::new(Self::point_id(&record.id), record.embedding, payload)
            })
            .collect();

        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        debug!("Upserting {} points to Qdrant", count);

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await?;

        info!("Successfully upserted {} chunks", count);
        Ok(())
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        allowed_sources: &[String],
        limit: u64,
    ) -> Result<Vec<ScoredChunk>> {
        let search = SearchPointsBuilder::new(&self.collection, embedding, limit)
            .with_payload(true)
            .filter(Self::source_filter(allowed_sources));

        let results = self.client.search_points(search).await?;

        let hits: Vec<ScoredChunk> = results
            .result
            .into_iter()
            .filter_map(|point| {
                let text = point.payload.get("text")?.as_str()?.to_string();
                let source_document = point
                    .payload
                    .get("source_document")?
                    .as_str()?
                    .to_string();

                Some(ScoredChunk {
                    text,
                    source_document,
                    score: point.score,
                })
            })
            .collect();

        debug!("Qdrant search returned {} hits", hits.len());
        Ok(hits)
    }
}

trait QdrantValueExt {
    fn as_str(&self) -> Option<&str>;
}

impl QdrantValueExt for QdrantValue {
    fn as_str(&self) -> Option<&str> {
        match &self.kind {
            Some(qdrant_client::qdrant::value::Kind::StringValue(v)) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ids_are_deterministic() {
        assert_eq!(QdrantStore::point_id("a.pdf_0"), QdrantStore::point_id("a.pdf_0"));
        assert_ne!(QdrantStore::point_id("a.pdf_0"), QdrantStore::point_id("a.pdf_1"));
    }

    #[test]
    fn point_id_is_a_valid_uuid() {
        let id = QdrantStore::point_id("report.pdf_12");
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn source_filter_holds_all_allowed_documents() {
        let filter =
            QdrantStore::source_filter(&["a.pdf".to_string(), "b.pdf".to_string()]);
        assert_eq!(filter.must.len(), 1);
    }
}
