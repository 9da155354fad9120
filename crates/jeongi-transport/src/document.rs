//! Document question-answering transport.
//!
//! The remote side is stateless per call: every question re-sends the bound
//! document, and the client's own transcript is the only continuity.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use jeongi_core::error::JeongiError;
use jeongi_core::types::SourceRef;

use crate::error::TransportError;

/// An uploaded document: opaque bytes plus the metadata the client declared.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a document from disk, inferring the media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, JeongiError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let media_type = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
            _ => "application/octet-stream",
        };
        Ok(Self::new(name, media_type, bytes))
    }
}

/// The assistant's answer to a document-grounded question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentAnswer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// Remote collaborator for the document question-answering surface.
#[async_trait]
pub trait DocumentQaTransport: Send + Sync {
    /// Ask one question against one document.
    async fn ask(
        &self,
        document: &DocumentFile,
        question: &str,
    ) -> Result<DocumentAnswer, TransportError>;
}

/// `DocumentQaTransport` over HTTP, posting a multipart form to the backend.
#[derive(Debug, Clone)]
pub struct HttpDocumentQaTransport {
    client: Client,
    base_url: String,
}

impl HttpDocumentQaTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DocumentQaTransport for HttpDocumentQaTransport {
    async fn ask(
        &self,
        document: &DocumentFile,
        question: &str,
    ) -> Result<DocumentAnswer, TransportError> {
        debug!(document = %document.name, "Sending document QA request");

        let file_part = Part::bytes(document.bytes.clone())
            .file_name(document.name.clone())
            .mime_str(&document.media_type)
            .map_err(|e| TransportError::Parse(e.to_string()))?;
        let form = Form::new()
            .part("file", file_part)
            .text("question", question.to_string());

        let resp = self
            .client
            .post(format!("{}/api/document-qa", self.base_url))
            .multipart(form)
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

        let answer: DocumentAnswer = resp.json().await?;
        Ok(answer)
    }
}
