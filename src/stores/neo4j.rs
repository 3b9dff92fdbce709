//! Knowledge graph backed by Neo4j.

use async_trait::async_trait;
use neo4rs::{query, Graph};
use tracing::debug;

use crate::capability::GraphStore;
use crate::ingestion::graph_writer::MergeStatement;
use crate::Result;

/// Graph store executing MERGE statements over a bolt connection.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect to a Neo4j server.
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password).await?;

        Ok(Self { graph })
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn run_merge(&self, stmt: &MergeStatement) -> Result<()> {
        // Labels and the relation type cannot be bound as parameters in
        // Cypher; they are interpolated into the statement text only after
        // sanitization. Node names and the filename go through parameters.
        let q = query(&stmt.cypher())
            .param("head", stmt.head.clone())
            .param("tail", stmt.tail.clone())
            .param("filename", stmt.filename.clone());

        self.graph.run(q).await?;
        debug!(
            "Merged ({})-[:{}]->({}) for '{}'",
            stmt.head, stmt.relation, stmt.tail, stmt.filename
        );
        Ok(())
    }
}
