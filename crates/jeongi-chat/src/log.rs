//! The append-only conversation transcript.

use jeongi_core::types::Message;

/// An ordered, append-only sequence of messages.
///
/// Insertion order is the transcript; entries are never mutated after being
/// pushed. Clearing or replacing the whole sequence is allowed (session reset,
/// document rebind, snapshot restore) but individual entries are not edited.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript with a single assistant greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    /// Append a message to the end of the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the whole transcript (snapshot restore).
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Drop every message (document rebind).
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
