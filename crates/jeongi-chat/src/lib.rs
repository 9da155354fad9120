//! Conversation session controllers.
//!
//! Two controllers own the client-side lifecycle of a conversation: the
//! general chat surface ([`ChatController`], durable and suggestion-rotating)
//! and the document-grounded surface ([`DocumentQaController`], scoped to one
//! bound file). Both share the same primitives: an append-only transcript, a
//! single-flight request guard, and local recovery from transport failures.

pub mod chat;
pub mod document;
pub mod error;
pub mod log;

pub use chat::{ChatController, ChatView};
pub use document::{DocumentQaController, DocumentView};
pub use error::ChatError;
pub use log::ConversationLog;
