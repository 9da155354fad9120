use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Who authored a message in a conversation transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person typing into the client.
    User,
    /// The remote assistant.
    Assistant,
}

// =============================================================================
// Structs
// =============================================================================

/// A citation attached to a document-grounded answer.
///
/// `page` is 1-based when the retriever knows it, `None` when the page could
/// not be determined for the chunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub page: Option<i64>,
    pub source: String,
}

/// One entry in a conversation transcript.
///
/// Immutable once created; the transcript is the insertion order of these
/// records. `sources` is only populated for document-grounded assistant turns
/// and stays empty everywhere else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, Vec::new())
    }

    /// Create an assistant message without citations.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, Vec::new())
    }

    /// Create an assistant message carrying citations.
    pub fn assistant_with_sources(content: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self::new(Role::Assistant, content, sources)
    }

    fn new(role: Role, content: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            sources,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
