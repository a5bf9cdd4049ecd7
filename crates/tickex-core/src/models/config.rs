//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the tickex pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickexConfig {
    /// Text recognition configuration.
    pub recognition: RecognitionConfig,

    /// Object store configuration.
    pub storage: StorageConfig,
}

impl Default for TickexConfig {
    fn default() -> Self {
        Self {
            recognition: RecognitionConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

/// OCR backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Endpoint of the OCR detect-text service.
    pub endpoint: String,

    /// Request timeout in seconds for one OCR call.
    pub request_timeout_secs: u64,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8021/detect-text".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Filesystem object-store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory under which bucket/key objects live.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("objects"),
        }
    }
}

impl TickexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = TickexConfig::default();
        config.save(&path).unwrap();

        let loaded = TickexConfig::from_file(&path).unwrap();
        assert_eq!(loaded.recognition.endpoint, config.recognition.endpoint);
        assert_eq!(loaded.storage.root, config.storage.root);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: TickexConfig =
            serde_json::from_str(r#"{"recognition": {"endpoint": "http://ocr:9000/detect"}}"#)
                .unwrap();
        assert_eq!(config.recognition.endpoint, "http://ocr:9000/detect");
        assert_eq!(config.recognition.request_timeout_secs, 30);
        assert_eq!(config.storage.root, PathBuf::from("objects"));
    }
}
