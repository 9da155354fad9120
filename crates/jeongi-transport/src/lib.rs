//! Transport collaborators for the conversation controllers.
//!
//! Each remote concern is one trait with one operation: [`ChatTransport`] for
//! the general chat endpoint and [`DocumentQaTransport`] for document-grounded
//! question answering. The HTTP implementations talk to the assistant backend;
//! everything behind the endpoint (reasoning, retrieval) is out of scope here.

pub mod chat;
pub mod document;
pub mod error;

pub use chat::{ChatReply, ChatTransport, ChatTurn, HttpChatTransport};
pub use document::{DocumentAnswer, DocumentFile, DocumentQaTransport, HttpDocumentQaTransport};
pub use error::TransportError;
