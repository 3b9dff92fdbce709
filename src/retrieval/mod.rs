//! Query answering: rephrasing, filtered vector search and synthesis.

pub mod answer;
pub mod rephrase;
pub mod search;

pub use answer::{get_answer, synthesize_answer, ANSWER_ERROR_MESSAGE, NO_RELEVANT_INFO_MESSAGE};
pub use rephrase::{format_chat_history, rephrase_question, ChatTurn, Role};
pub use search::{search_context, SEARCH_TOP_K};
