//! Idempotent persistence of extracted facts into the graph store.
//!
//! Labels and the relation type have to be interpolated into the Cypher
//! text (Neo4j does not parameterize them), so [`MergeStatement`] only
//! accepts them through the sanitizing constructor; entity names and the
//! filename stay bound parameters.

use tracing::{debug, info, warn};

use super::fact::{sanitize_relation, EntityLabel, Fact};
use crate::capability::GraphStore;
use crate::Result;

/// Relation used when the model left the field blank.
const DEFAULT_RELATION: &str = "RELATED_TO";

/// A validated merge-style write: one head node, one tail node, one edge.
/// Nodes are keyed on `(label, name, filename)` and the edge on
/// `(head, relation, tail)`, so replaying the statement never duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStatement {
    pub head_label: EntityLabel,
    pub tail_label: EntityLabel,
    pub relation: String,
    pub head: String,
    pub tail: String,
    pub filename: String,
}

impl MergeStatement {
    /// Build a statement from a fact. Blank relations default to
    /// `RELATED_TO`; returns `None` when nothing survives sanitization.
    pub fn from_fact(fact: &Fact, filename: &str) -> Option<Self> {
        let raw_relation = if fact.relation.trim().is_empty() {
            DEFAULT_RELATION
        } else {
            fact.relation.as_str()
        };
        let relation = sanitize_relation(raw_relation)?;

        if fact.subject.trim().is_empty() || fact.object.trim().is_empty() {
            return None;
        }

        Some(Self {
            head_label: fact.subject_label,
            tail_label: fact.object_label,
            relation,
            head: fact.subject.clone(),
            tail: fact.object.clone(),
            filename: filename.to_string(),
        })
    }

    /// Cypher text with sanitized identifiers interpolated and literal
    /// values left as `$head` / `$tail` / `$filename` parameters.
    pub fn cypher(&self) -> String {
        format!(
            "MERGE (h:{} {{name: $head, filename: $filename}}) \
             MERGE (t:{} {{name: $tail, filename: $filename}}) \
             MERGE (h)-[:`{}`]->(t)",
            self.head_label.as_str(),
            self.tail_label.as_str(),
            self.relation,
        )
    }
}

/// Persist facts for one document. Facts that fail sanitization are
/// skipped; a store error on one fact is logged and the batch continues, so
/// at worst "some facts may be missing". Returns the number written.
pub async fn store_facts(facts: &[Fact], filename: &str, graph: &dyn GraphStore) -> Result<usize> {
    if facts.is_empty() {
        debug!("No facts to store for '{}'", filename);
        return Ok(0);
    }

    let mut written = 0usize;

    for fact in facts {
        let Some(stmt) = MergeStatement::from_fact(fact, filename) else {
            warn!(
                "Skipping unsanitizable fact ({} -> {} -> {})",
                fact.subject, fact.relation, fact.object
            );
            continue;
        };

        match graph.run_merge(&stmt).await {
            Ok(()) => written += 1,
            Err(err) => {
                warn!(
                    "Merge failed for fact ({} -> {} -> {}): {}",
                    stmt.head, stmt.relation, stmt.tail, err
                );
            }
        }
    }

    info!(
        "Stored {}/{} facts for '{}' in the graph",
        written,
        facts.len(),
        filename
    );
    Ok(written)
}
