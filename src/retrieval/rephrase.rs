//! Follow-up question rephrasing using conversation history.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::capability::LanguageModel;
use crate::prompts;

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation supplied with a query. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Format history as alternating `Human:` / `AI:` lines in original order.
pub fn format_chat_history(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| match turn.role {
            Role::User => format!("Human: {}", turn.content),
            Role::Assistant => format!("AI: {}", turn.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite a follow-up question into a standalone one.
///
/// With no history the original query is returned without a model call.
/// A model failure also falls back to the original query: rephrasing must
/// never abort the answer flow.
pub async fn rephrase_question(
    query: &str,
    history: &[ChatTurn],
    llm: &dyn LanguageModel,
) -> String {
    if history.is_empty() {
        info!("No chat history, keeping original query");
        return query.to_string();
    }

    let prompt = prompts::rephrase_prompt(&format_chat_history(history), query);

    match llm.generate(&prompt).await {
        Ok(response) => {
            let standalone = response.trim().to_string();
            info!("Rephrased '{}' into '{}'", query, standalone);
            standalone
        }
        Err(err) => {
            warn!("Rephrasing failed, falling back to original query: {}", err);
            query.to_string()
        }
    }
}
