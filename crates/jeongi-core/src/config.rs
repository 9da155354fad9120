use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{JeongiError, Result};

/// Top-level configuration for the jeongi client.
///
/// Loaded from `~/.jeongi/config.toml` by default. Every field has a default
/// so a missing or partial file still yields a working client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JeongiConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

impl JeongiConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: JeongiConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| JeongiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Remote assistant endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the assistant backend.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// General chat surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Assistant greeting shown when a conversation starts fresh.
    pub greeting: String,
    /// Fixed assistant message inserted when the transport call fails.
    pub error_message: String,
    /// Follow-up suggestions offered before the server supplies its own.
    pub initial_suggestions: Vec<String>,
    /// Storage key under which the transcript snapshot is persisted.
    pub storage_key: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: "안녕하세요! 전기·전자 분야 학습 도우미입니다. 무엇이든 물어보세요."
                .to_string(),
            error_message: "서버 오류가 발생했습니다. OPENAI_API_KEY가 설정되었는지 확인하세요."
                .to_string(),
            initial_suggestions: vec![
                "옴의 법칙에 대해 설명해줘".to_string(),
                "전기기사 실기 준비 방법 알려줘".to_string(),
                "3상 전력 계산 방법이 궁금해".to_string(),
            ],
            storage_key: "jeongi.chat.history".to_string(),
        }
    }
}

/// Document question-answering surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// The single accepted media type for uploaded documents.
    pub accepted_media_type: String,
    /// Fixed assistant message inserted when the transport call fails.
    pub error_message: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            accepted_media_type: "application/pdf".to_string(),
            error_message: "문서 분석 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JeongiConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.document.accepted_media_type, "application/pdf");
        assert!(!config.chat.greeting.is_empty());
        assert_eq!(config.chat.initial_suggestions.len(), 3);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = JeongiConfig::default();
        config.server.base_url = "http://example.test:9000".to_string();
        config.chat.storage_key = "custom.key".to_string();
        config.save(&path).unwrap();

        let loaded = JeongiConfig::load(&path).unwrap();
        assert_eq!(loaded.server.base_url, "http://example.test:9000");
        assert_eq!(loaded.chat.storage_key, "custom.key");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = JeongiConfig::load_or_default(&dir.path().join("nope.toml"));
        assert_eq!(config.server.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://10.0.0.2:8000\"\n").unwrap();

        let config = JeongiConfig::load(&path).unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.document.accepted_media_type, "application/pdf");
    }
}
