//! Secret resolution and the optional filesystem-backed resolution cache.

use crate::error::ConfigError;
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use std::path::PathBuf;
use tracing::debug;

/// Directory name for cache entries under the OS temp directory.
const CACHE_NAMESPACE: &str = "stratum-config";

/// Loads secret material for `$from.secret` directives.
///
/// Implementations wrap whatever backing store a deployment uses. Failures
/// are reported as [`ConfigError::SecretLoad`] and abort the whole load.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Resolve `reference` to its secret value.
    ///
    /// `context_path` is the structural path of the directive requesting the
    /// secret; implementations should include it in error diagnostics.
    async fn load(&self, reference: &str, context_path: &str) -> Result<String, ConfigError>;
}

/// Placeholder for deployments without a secret store.
///
/// Any `$from.secret` directive fails loudly instead of being skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSecretStore;

#[async_trait]
impl SecretResolver for NoSecretStore {
    async fn load(&self, reference: &str, context_path: &str) -> Result<String, ConfigError> {
        Err(ConfigError::secret_load(
            reference,
            context_path,
            "no secret store configured",
        ))
    }
}

/// Wraps a resolver with a filesystem cache keyed by the secret reference.
///
/// Entries live under `<cache_dir>/<base64(reference)>`. A failed cache read
/// is treated as a miss and falls through to live resolution; this is the
/// only error the crate ever downgrades. Two directives naming the same
/// reference share one entry, regardless of where in the tree they appear.
pub struct CachedSecrets<R> {
    inner: R,
    cache_dir: PathBuf,
}

impl<R> CachedSecrets<R> {
    /// Cache in the default namespace under the OS temp directory.
    pub fn new(inner: R) -> Self {
        Self::with_cache_dir(inner, std::env::temp_dir().join(CACHE_NAMESPACE))
    }

    /// Cache under an explicit directory.
    pub fn with_cache_dir(inner: R, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            cache_dir: cache_dir.into(),
        }
    }

    fn entry_path(&self, reference: &str) -> PathBuf {
        self.cache_dir.join(URL_SAFE_NO_PAD.encode(reference))
    }
}

#[async_trait]
impl<R: SecretResolver> SecretResolver for CachedSecrets<R> {
    async fn load(&self, reference: &str, context_path: &str) -> Result<String, ConfigError> {
        let entry = self.entry_path(reference);
        if let Ok(cached) = tokio::fs::read_to_string(&entry).await {
            debug!(reference, "secret served from cache");
            return Ok(cached);
        }

        let value = self.inner.load(reference, context_path).await?;

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| {
                ConfigError::secret_load(
                    reference,
                    context_path,
                    format!("could not create secret cache directory: {e}"),
                )
            })?;
        tokio::fs::write(&entry, &value).await.map_err(|e| {
            ConfigError::secret_load(
                reference,
                context_path,
                format!("could not cache secret: {e}"),
            )
        })?;
        debug!(reference, "secret cached");

        Ok(value)
    }
}
