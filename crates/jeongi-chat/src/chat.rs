//! The general conversation controller.
//!
//! Owns one open-ended chat session: optimistic user appends, a single-flight
//! request guard, durable transcript snapshots, and rotation of the follow-up
//! suggestions supplied by the assistant.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use jeongi_core::config::ChatConfig;
use jeongi_core::types::Message;
use jeongi_storage::SnapshotStore;
use jeongi_transport::chat::{ChatTransport, ChatTurn};

use crate::log::ConversationLog;

/// Atomic cloned view of a chat session, for presentation surfaces.
#[derive(Debug, Clone)]
pub struct ChatView {
    pub messages: Vec<Message>,
    pub awaiting_response: bool,
    pub suggestions: Vec<String>,
}

struct ChatState {
    log: ConversationLog,
    awaiting: bool,
    suggestions: Vec<String>,
    /// Bumped on session reset; a completion whose generation no longer
    /// matches belongs to a discarded transcript and is dropped.
    generation: u64,
}

/// Controller for the open-ended chat surface.
///
/// State lives behind a mutex that is never held across the transport await:
/// the request payload is captured under the lock, the lock is released for
/// the call, and the completion re-acquires it to commit against whatever the
/// state is *then*.
pub struct ChatController<T: ChatTransport> {
    transport: T,
    store: Arc<dyn SnapshotStore>,
    config: ChatConfig,
    state: Mutex<ChatState>,
}

impl<T: ChatTransport> ChatController<T> {
    /// Create a controller in the default single-greeting state.
    pub fn new(transport: T, store: Arc<dyn SnapshotStore>, config: ChatConfig) -> Self {
        let state = ChatState {
            log: ConversationLog::with_greeting(&config.greeting),
            awaiting: false,
            suggestions: config.initial_suggestions.clone(),
            generation: 0,
        };
        Self {
            transport,
            store,
            config,
            state: Mutex::new(state),
        }
    }

    /// Restore the persisted transcript, if one exists.
    ///
    /// The only place snapshot deserialization happens. A malformed or empty
    /// snapshot is discarded (the key is removed) and the default greeting
    /// state is kept; the failure is logged, never surfaced.
    pub fn initialize(&self) {
        let Some(raw) = self.store.get(&self.config.storage_key) else {
            return;
        };
        match serde_json::from_str::<Vec<Message>>(&raw) {
            Ok(messages) if !messages.is_empty() => {
                let mut st = self.lock();
                st.log.replace(messages);
            }
            Ok(_) => {
                warn!("Persisted transcript was empty; starting fresh");
                self.store.remove(&self.config.storage_key);
            }
            Err(e) => {
                warn!("Discarding malformed transcript snapshot: {}", e);
                self.store.remove(&self.config.storage_key);
            }
        }
    }

    /// Submit one user turn.
    ///
    /// Silent no-op when the text is blank or a request is already in flight.
    /// The user message is appended before the transport call (optimistic
    /// update) from the value passed in, so rapid sequential calls cannot
    /// lose input.
    pub async fn submit(&self, text: &str) {
        let text = text.trim();

        let (turns, generation) = {
            let mut st = self.lock();
            if text.is_empty() || st.awaiting {
                return;
            }
            st.log.push(Message::user(text));
            st.awaiting = true;
            self.persist(&st);
            let turns: Vec<ChatTurn> = st.log.messages().iter().map(ChatTurn::from).collect();
            (turns, st.generation)
        };

        let result = self.transport.send(&turns).await;

        // Commit against the latest state, not the pre-await capture.
        let mut st = self.lock();
        if st.generation != generation {
            debug!("Dropping reply for a session that was reset mid-flight");
            return;
        }
        match result {
            Ok(reply) => {
                st.log.push(Message::assistant(reply.output));
                // An empty suggestion list leaves the previous set in place.
                if !reply.suggestions.is_empty() {
                    st.suggestions = reply.suggestions;
                }
            }
            Err(e) => {
                warn!("Chat transport failed: {}", e);
                st.log
                    .push(Message::assistant(self.config.error_message.clone()));
            }
        }
        st.awaiting = false;
        self.persist(&st);
    }

    /// Submit a suggested follow-up; same rules as [`submit`](Self::submit).
    pub async fn select_suggestion(&self, text: &str) {
        self.submit(text).await;
    }

    /// Drop the persisted snapshot and return to the single-greeting state.
    pub fn reset_session(&self) {
        let mut st = self.lock();
        st.generation += 1;
        st.log = ConversationLog::with_greeting(&self.config.greeting);
        st.awaiting = false;
        st.suggestions = self.config.initial_suggestions.clone();
        self.store.remove(&self.config.storage_key);
    }

    /// Atomic snapshot of the session for rendering.
    pub fn snapshot(&self) -> ChatView {
        let st = self.lock();
        ChatView {
            messages: st.log.messages().to_vec(),
            awaiting_response: st.awaiting,
            suggestions: st.suggestions.clone(),
        }
    }

    /// Write the full transcript (never deltas) under the storage key.
    fn persist(&self, st: &ChatState) {
        match serde_json::to_string(st.log.messages()) {
            Ok(raw) => self.store.set(&self.config.storage_key, &raw),
            Err(e) => warn!("Failed to serialize transcript: {}", e),
        }
    }

    // A poisoned lock still must complete the AwaitingResponse -> Idle
    // transition, so poisoning is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
