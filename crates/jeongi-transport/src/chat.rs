//! General chat transport.
//!
//! One operation: send the ordered transcript, receive the assistant's answer
//! plus a rotating set of follow-up suggestions.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use jeongi_core::types::{Message, Role};

use crate::error::TransportError;

/// One transcript entry on the wire: role and content only, transient state
/// stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for ChatTurn {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

/// The assistant's reply to a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub output: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Remote collaborator for the general chat surface.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the full ordered transcript; the reply is the next assistant turn.
    async fn send(&self, turns: &[ChatTurn]) -> Result<ChatReply, TransportError>;
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    messages: &'a [ChatTurn],
}

/// `ChatTransport` over HTTP, posting JSON to the assistant backend.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: Client,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, turns: &[ChatTurn]) -> Result<ChatReply, TransportError> {
        debug!(turns = turns.len(), "Sending chat request");

        let resp = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequestBody { messages: turns })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            return Err(TransportError::Api {
                status,
                message: text,
            });
        }

        let reply: ChatReply = resp.json().await?;
        Ok(reply)
    }
}
