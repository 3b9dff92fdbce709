//! API clients for the hosted model providers.

pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::EmbeddingService;
