//! Language-model call error surface.
//!
//! The model is an opaque request/response collaborator: the gateway
//! hands it the user message plus transcript and gets text back. Only
//! the failure modes matter to this crate.

use thiserror::Error;

/// Errors from a language-model completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model call timed out")]
    Timeout,

    #[error("model request failed: {0}")]
    Request(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
