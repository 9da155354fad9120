use thiserror::Error;

/// Errors from a remote transport call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<TransportError> for jeongi_core::JeongiError {
    fn from(err: TransportError) -> Self {
        jeongi_core::JeongiError::Transport(err.to_string())
    }
}
