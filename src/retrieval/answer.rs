//! Final answer synthesis and the retrieval orchestration flow.

use tracing::{info, warn};

use super::rephrase::{rephrase_question, ChatTurn};
use super::search::search_context;
use crate::capability::{Embedder, LanguageModel, VectorStore};
use crate::config::Settings;
use crate::prompts;
use crate::Result;

/// Returned when the vector search finds no usable context.
pub const NO_RELEVANT_INFO_MESSAGE: &str =
    "Sorry, I could not find any information relevant to your question in the available documents.";

/// Returned when the final model call fails; raw errors stay in the logs.
pub const ANSWER_ERROR_MESSAGE: &str =
    "Sorry, an internal error occurred while I was formulating the answer.";

/// Compose the final answer from retrieved context. Assumes non-empty
/// context; the orchestrator short-circuits before calling this otherwise.
pub async fn synthesize_answer(
    rephrased_query: &str,
    context: &str,
    language: &str,
    llm: &dyn LanguageModel,
) -> String {
    let prompt = prompts::final_answer_prompt(context, rephrased_query, language);

    match llm.generate(&prompt).await {
        Ok(answer) => {
            info!("Final answer generated");
            answer.trim().to_string()
        }
        Err(err) => {
            warn!("Final answer generation failed: {}", err);
            ANSWER_ERROR_MESSAGE.to_string()
        }
    }
}

/// Answer one query: rephrase with history, retrieve scoped context,
/// synthesize. Each call is independent; no state is kept between queries.
pub async fn get_answer(
    query: &str,
    filenames: &[String],
    history: &[ChatTurn],
    llm: &dyn LanguageModel,
    store: &dyn VectorStore,
    embedder: &dyn Embedder,
    settings: &Settings,
) -> Result<String> {
    info!("Answering query '{}' over files {:?}", query, filenames);

    let rephrased = rephrase_question(query, history, llm).await;
    if rephrased != query {
        info!("Question rephrased to '{}'", rephrased);
    }

    let context = search_context(&rephrased, filenames, store, embedder).await?;
    if context.is_empty() {
        warn!("No relevant context found for '{}'", rephrased);
        return Ok(NO_RELEVANT_INFO_MESSAGE.to_string());
    }

    info!("Retrieved enriched context ({} characters)", context.len());
    Ok(synthesize_answer(&rephrased, &context, &settings.answer_language, llm).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::mocks::{MockEmbedder, MockLlm, MockVectorStore};
    use crate::capability::IndexedRecord;
    use crate::retrieval::rephrase::ChatTurn;

    async fn seed(store: &MockVectorStore, embedder: &MockEmbedder, source: &str, text: &str) {
        let embedding = embedder.embed(text).await.unwrap();
        store
            .upsert(vec![IndexedRecord {
                id: format!("{}_0", source),
                text: text.to_string(),
                embedding,
                source_document: source.to_string(),
            }])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_context_short_circuits_before_synthesis() {
        let llm = MockLlm::replying("never called");
        let store = MockVectorStore::new();
        let embedder = MockEmbedder::new(32);

        let answer = get_answer(
            "What is in the report?",
            &["a.pdf".to_string()],
            &[],
            &llm,
            &store,
            &embedder,
            &Settings::default(),
        )
        .await
        .unwrap();

        assert_eq!(answer, NO_RELEVANT_INFO_MESSAGE);
        // Empty history skipped rephrasing and empty context skipped
        // synthesis, so the model was never called.
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn rephrasing_happens_before_retrieval() {
        // First call rephrases, second synthesizes.
        let llm = MockLlm::script(vec![
            Ok("Where does Ely Mulyadi work?".to_string()),
            Ok("Ely Mulyadi works at TEFA JTI Innovation.".to_string()),
        ]);
        let store = MockVectorStore::new();
        let embedder = MockEmbedder::new(64);
        seed(
            &store,
            &embedder,
            "cert.pdf",
            "Ely Mulyadi is the Manager of TEFA JTI Innovation.",
        )
        .await;
        // A decoy that matches the raw follow-up wording, not the entity.
        seed(&store, &embedder, "decoy.pdf", "Where does he work, anyway?").await;

        let history = vec![
            ChatTurn::user("Who is the manager?"),
            ChatTurn::assistant("Ely."),
        ];

        let answer = get_answer(
            "Where does he work?",
            &["cert.pdf".to_string()],
            &history,
            &llm,
            &store,
            &embedder,
            &Settings::default(),
        )
        .await
        .unwrap();

        assert_eq!(answer, "Ely Mulyadi works at TEFA JTI Innovation.");
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn synthesis_failure_returns_fixed_error_message() {
        // Rephrase succeeds, final answer call fails.
        let llm = MockLlm::script(vec![
            Ok("standalone question".to_string()),
            Err("model unavailable".to_string()),
        ]);
        let store = MockVectorStore::new();
        let embedder = MockEmbedder::new(64);
        seed(&store, &embedder, "a.pdf", "standalone question context").await;

        let answer = get_answer(
            "follow up?",
            &["a.pdf".to_string()],
            &[ChatTurn::user("earlier turn")],
            &llm,
            &store,
            &embedder,
            &Settings::default(),
        )
        .await
        .unwrap();

        assert_eq!(answer, ANSWER_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn answers_from_scoped_documents_only() {
        let llm = MockLlm::replying("The report covers revenue.");
        let store = MockVectorStore::new();
        let embedder = MockEmbedder::new(64);
        seed(&store, &embedder, "a.pdf", "revenue grew in the first quarter").await;
        seed(&store, &embedder, "b.pdf", "revenue grew in the second quarter").await;

        let answer = get_answer(
            "what happened to revenue",
            &["a.pdf".to_string()],
            &[],
            &llm,
            &store,
            &embedder,
            &Settings::default(),
        )
        .await
        .unwrap();

        assert_eq!(answer, "The report covers revenue.");
    }

    #[tokio::test]
    async fn synthesize_answer_trims_model_output() {
        let llm = MockLlm::replying("  The answer.  \n");

        let answer = synthesize_answer("q", "ctx", "English", &llm).await;

        assert_eq!(answer, "The answer.");
    }
}
