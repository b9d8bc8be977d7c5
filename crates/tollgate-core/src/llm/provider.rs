//! ChatModel trait definition.
//!
//! The model is the one collaborator the gateway treats as fully opaque:
//! a user message plus transcript context in, response text out, with a
//! timeout-and-error failure surface.

use tollgate_types::chat::Transcript;
use tollgate_types::llm::LlmError;

/// Trait for language-model backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in tollgate-infra (e.g. `OpenAiCompatClient`).
pub trait ChatModel: Send + Sync {
    /// Produce a response to `user_message` given the conversation so far.
    ///
    /// The call is blocking-with-timeout; a timed-out or failed call
    /// returns an error, never hangs the caller indefinitely.
    fn complete(
        &self,
        user_message: &str,
        history: &Transcript,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
