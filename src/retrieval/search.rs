//! Filtered vector search producing the retrieval context.

use tracing::{debug, info};

use crate::capability::{Embedder, VectorStore};
use crate::Result;

/// Nearest neighbours fetched per query.
pub const SEARCH_TOP_K: u64 = 5;

/// Run a top-k similarity search scoped to `allowed_filenames` and join the
/// hit texts into one context string, best match first. Zero hits return an
/// empty string, the distinct "no relevant context" outcome, not an error.
pub async fn search_context(
    query: &str,
    allowed_filenames: &[String],
    store: &dyn VectorStore,
    embedder: &dyn Embedder,
) -> Result<String> {
    let embedding = embedder.embed(query).await?;
    let hits = store.search(embedding, allowed_filenames, SEARCH_TOP_K).await?;

    if hits.is_empty() {
        debug!("Vector search for '{}' returned no hits", query);
        return Ok(String::new());
    }

    info!(
        "Vector search returned {} hits from {:?}",
        hits.len(),
        allowed_filenames
    );

    let context = hits
        .iter()
        .map(|hit| hit.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(context)
}
