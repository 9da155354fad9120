//! The document-grounded conversation controller.
//!
//! One conversation per bound document and nothing persisted: rebinding (or
//! unbinding) discards the transcript unconditionally, so history never bleeds
//! across documents. Assistant turns carry the citation list returned by the
//! retriever.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use jeongi_core::config::DocumentConfig;
use jeongi_core::types::Message;
use jeongi_transport::document::{DocumentFile, DocumentQaTransport};

use crate::error::ChatError;
use crate::log::ConversationLog;

/// Atomic cloned view of a document QA session.
#[derive(Debug, Clone)]
pub struct DocumentView {
    /// Name of the bound document, if any.
    pub document: Option<String>,
    pub status: String,
    pub messages: Vec<Message>,
    pub awaiting_response: bool,
}

struct DocState {
    binding: Option<Arc<DocumentFile>>,
    status: String,
    log: ConversationLog,
    awaiting: bool,
    /// Bumped whenever the binding changes; a completion whose generation no
    /// longer matches belongs to a document that is no longer bound.
    generation: u64,
}

/// Controller for the document question-answering surface.
pub struct DocumentQaController<T: DocumentQaTransport> {
    transport: T,
    config: DocumentConfig,
    state: Mutex<DocState>,
}

impl<T: DocumentQaTransport> DocumentQaController<T> {
    /// Create a controller in the unbound state.
    pub fn new(transport: T, config: DocumentConfig) -> Self {
        let state = DocState {
            binding: None,
            status: unbound_status().to_string(),
            log: ConversationLog::new(),
            awaiting: false,
            generation: 0,
        };
        Self {
            transport,
            config,
            state: Mutex::new(state),
        }
    }

    /// Bind a document, replacing any previous binding.
    ///
    /// The single acceptance rule for every ingestion modality (file picker,
    /// drag-and-drop, CLI path): the declared media type must match the
    /// configured one. Rejection leaves all state untouched.
    pub fn bind_document(&self, file: DocumentFile) -> Result<(), ChatError> {
        if file.media_type != self.config.accepted_media_type {
            return Err(ChatError::UnsupportedDocument(file.media_type));
        }

        let mut st = self.lock();
        st.generation += 1;
        st.status = ready_status(&file.name);
        st.log.clear();
        st.binding = Some(Arc::new(file));
        st.awaiting = false;
        Ok(())
    }

    /// Clear the binding and return to the unbound presentation state.
    pub fn unbind_document(&self) {
        let mut st = self.lock();
        st.generation += 1;
        st.binding = None;
        st.log.clear();
        st.awaiting = false;
        st.status = unbound_status().to_string();
    }

    /// Ask one question against the bound document.
    ///
    /// Silent no-op when unbound, blank, or a request is in flight. The remote
    /// side is stateless per call; this transcript is the only continuity.
    pub async fn ask(&self, question: &str) {
        let question = question.trim();

        let (document, generation) = {
            let mut st = self.lock();
            if question.is_empty() || st.awaiting {
                return;
            }
            let Some(document) = st.binding.clone() else {
                return;
            };
            st.log.push(Message::user(question));
            st.awaiting = true;
            st.status = busy_status(&document.name);
            (document, st.generation)
        };

        let result = self.transport.ask(&document, question).await;

        // Commit against the latest state, not the pre-await capture.
        let mut st = self.lock();
        if st.generation != generation {
            debug!("Dropping answer for a document that is no longer bound");
            return;
        }
        match result {
            Ok(answer) => {
                st.log
                    .push(Message::assistant_with_sources(answer.answer, answer.sources));
            }
            Err(e) => {
                warn!("Document QA transport failed: {}", e);
                st.log
                    .push(Message::assistant(self.config.error_message.clone()));
            }
        }
        st.awaiting = false;
        st.status = ready_status(&document.name);
    }

    /// Atomic snapshot of the session for rendering.
    pub fn snapshot(&self) -> DocumentView {
        let st = self.lock();
        DocumentView {
            document: st.binding.as_ref().map(|d| d.name.clone()),
            status: st.status.clone(),
            messages: st.log.messages().to_vec(),
            awaiting_response: st.awaiting,
        }
    }

    // A poisoned lock still must complete the AwaitingResponse -> Idle
    // transition, so poisoning is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, DocState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unbound_status() -> &'static str {
    "문서를 업로드하면 질문할 수 있습니다."
}

fn ready_status(name: &str) -> String {
    format!("'{}' 문서가 준비되었습니다. 질문을 입력하세요.", name)
}

fn busy_status(name: &str) -> String {
    format!("'{}' 문서에서 답을 찾는 중입니다...", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use jeongi_core::types::{Role, SourceRef};
    use jeongi_transport::document::DocumentAnswer;
    use jeongi_transport::TransportError;

    struct FixedTransport {
        answer: DocumentAnswer,
    }

    #[async_trait]
    impl DocumentQaTransport for FixedTransport {
        async fn ask(
            &self,
            _document: &DocumentFile,
            _question: &str,
        ) -> Result<DocumentAnswer, TransportError> {
            Ok(self.answer.clone())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl DocumentQaTransport for FailingTransport {
        async fn ask(
            &self,
            _document: &DocumentFile,
            _question: &str,
        ) -> Result<DocumentAnswer, TransportError> {
            Err(TransportError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    struct GatedTransport {
        gate: Arc<Notify>,
        answer: DocumentAnswer,
    }

    #[async_trait]
    impl DocumentQaTransport for GatedTransport {
        async fn ask(
            &self,
            _document: &DocumentFile,
            _question: &str,
        ) -> Result<DocumentAnswer, TransportError> {
            self.gate.notified().await;
            Ok(self.answer.clone())
        }
    }

    fn make_pdf(name: &str) -> DocumentFile {
        DocumentFile::new(name, "application/pdf", vec![0x25, 0x50, 0x44, 0x46])
    }

    fn make_answer(text: &str, sources: Vec<SourceRef>) -> DocumentAnswer {
        DocumentAnswer {
            answer: text.to_string(),
            sources,
        }
    }

    fn make_controller<T: DocumentQaTransport>(transport: T) -> DocumentQaController<T> {
        DocumentQaController::new(transport, DocumentConfig::default())
    }

    // ---- Binding ----

    #[test]
    fn test_fresh_controller_is_unbound() {
        let controller = make_controller(FailingTransport);
        let view = controller.snapshot();
        assert_eq!(view.document, None);
        assert!(view.messages.is_empty());
        assert!(!view.awaiting_response);
    }

    #[test]
    fn test_bind_accepts_pdf_and_sets_status() {
        let controller = make_controller(FailingTransport);
        controller.bind_document(make_pdf("kec_규정.pdf")).unwrap();

        let view = controller.snapshot();
        assert_eq!(view.document.as_deref(), Some("kec_규정.pdf"));
        assert!(view.status.contains("kec_규정.pdf"));
    }

    #[test]
    fn test_bind_rejects_wrong_media_type() {
        let controller = make_controller(FailingTransport);
        let wrong = DocumentFile::new("photo.png", "image/png", vec![1, 2, 3]);

        let err = controller.bind_document(wrong).unwrap_err();
        assert!(matches!(err, ChatError::UnsupportedDocument(ref t) if t == "image/png"));

        // No state change on rejection.
        let view = controller.snapshot();
        assert_eq!(view.document, None);
        assert!(view.messages.is_empty());
    }

    #[tokio::test]
    async fn test_rebind_clears_previous_conversation() {
        let controller = make_controller(FixedTransport {
            answer: make_answer("답변", vec![]),
        });
        controller.bind_document(make_pdf("a.pdf")).unwrap();
        controller.ask("질문").await;
        assert_eq!(controller.snapshot().messages.len(), 2);

        controller.bind_document(make_pdf("b.pdf")).unwrap();
        let view = controller.snapshot();
        assert!(view.messages.is_empty());
        assert_eq!(view.document.as_deref(), Some("b.pdf"));
    }

    #[tokio::test]
    async fn test_unbind_clears_everything() {
        let controller = make_controller(FixedTransport {
            answer: make_answer("답변", vec![]),
        });
        controller.bind_document(make_pdf("a.pdf")).unwrap();
        controller.ask("질문").await;

        controller.unbind_document();
        let view = controller.snapshot();
        assert_eq!(view.document, None);
        assert!(view.messages.is_empty());
        assert!(!view.awaiting_response);
    }

    // ---- Ask ----

    #[tokio::test]
    async fn test_ask_appends_answer_with_sources() {
        let sources = vec![
            SourceRef {
                page: Some(12),
                source: "a.pdf".to_string(),
            },
            SourceRef {
                page: None,
                source: "a.pdf".to_string(),
            },
        ];
        let controller = make_controller(FixedTransport {
            answer: make_answer("접지 저항 기준은...", sources.clone()),
        });
        controller.bind_document(make_pdf("a.pdf")).unwrap();
        controller.ask("접지 저항 기준 알려줘").await;

        let view = controller.snapshot();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[0].role, Role::User);
        assert_eq!(view.messages[1].role, Role::Assistant);
        assert_eq!(view.messages[1].sources, sources);
        assert!(!view.awaiting_response);
        assert!(view.status.contains("질문을 입력하세요"));
    }

    #[tokio::test]
    async fn test_ask_without_document_is_noop() {
        let controller = make_controller(FixedTransport {
            answer: make_answer("답변", vec![]),
        });
        controller.ask("질문").await;
        assert!(controller.snapshot().messages.is_empty());
    }

    #[tokio::test]
    async fn test_ask_blank_is_noop() {
        let controller = make_controller(FixedTransport {
            answer: make_answer("답변", vec![]),
        });
        controller.bind_document(make_pdf("a.pdf")).unwrap();
        controller.ask("  \n ").await;
        assert!(controller.snapshot().messages.is_empty());
    }

    #[tokio::test]
    async fn test_ask_failure_appends_fixed_error() {
        let controller = make_controller(FailingTransport);
        controller.bind_document(make_pdf("a.pdf")).unwrap();
        controller.ask("질문").await;

        let view = controller.snapshot();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(
            view.messages[1].content,
            DocumentConfig::default().error_message
        );
        assert!(!view.awaiting_response);
    }

    #[tokio::test]
    async fn test_ask_rejected_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let controller = Arc::new(make_controller(GatedTransport {
            gate: gate.clone(),
            answer: make_answer("첫 답변", vec![]),
        }));
        controller.bind_document(make_pdf("a.pdf")).unwrap();

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.ask("첫 질문").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let view = controller.snapshot();
        assert!(view.awaiting_response);
        assert!(view.status.contains("찾는 중"));
        assert_eq!(view.messages.len(), 1);

        controller.ask("둘째 질문").await;
        assert_eq!(controller.snapshot().messages.len(), 1);

        gate.notify_one();
        first.await.unwrap();

        let view = controller.snapshot();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[1].content, "첫 답변");
    }

    #[tokio::test]
    async fn test_rebind_during_flight_drops_stale_answer() {
        let gate = Arc::new(Notify::new());
        let controller = Arc::new(make_controller(GatedTransport {
            gate: gate.clone(),
            answer: make_answer("a.pdf에 대한 답변", vec![]),
        }));
        controller.bind_document(make_pdf("a.pdf")).unwrap();

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.ask("질문").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        controller.bind_document(make_pdf("b.pdf")).unwrap();
        gate.notify_one();
        pending.await.unwrap();

        // b.pdf's conversation stays empty; a.pdf's answer is gone.
        let view = controller.snapshot();
        assert!(view.messages.is_empty());
        assert_eq!(view.document.as_deref(), Some("b.pdf"));
        assert!(!view.awaiting_response);
    }
}
