//! Document sources: how raw layer files become parsed trees.

use crate::error::ConfigError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Reads one layer document from a path.
///
/// Any I/O or parse problem is a [`ConfigError::Read`]; there is no partial
/// success. An empty document parses to null and is dropped by the loader.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Read and parse the document at `path`.
    async fn read(&self, path: &Path) -> Result<Value, ConfigError>;
}

/// Reads YAML layer files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlFileSource;

#[async_trait]
impl DocumentSource for YamlFileSource {
    async fn read(&self, path: &Path) -> Result<Value, ConfigError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::read(path, e.to_string()))?;
        let value: Value =
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::read(path, e.to_string()))?;
        debug!(path = %path.display(), "parsed config layer");
        Ok(value)
    }
}
