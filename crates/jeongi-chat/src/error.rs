//! Error types for the conversation controllers.
//!
//! Transport failures never appear here: they are recovered inside the
//! controllers as in-conversation assistant messages. Only synchronous
//! validation failures are surfaced to the caller.

use thiserror::Error;

/// Errors surfaced by a conversation controller.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),
}

impl From<ChatError> for jeongi_core::JeongiError {
    fn from(err: ChatError) -> Self {
        jeongi_core::JeongiError::Validation(err.to_string())
    }
}
