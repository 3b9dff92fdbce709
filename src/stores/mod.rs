//! Production store adapters for the capability traits.

pub mod neo4j;
pub mod qdrant;

pub use neo4j::Neo4jStore;
pub use qdrant::QdrantStore;
