//! The load pipeline: read layers, resolve directives, merge, validate.

use crate::env::{EnvResolver, ProcessEnv};
use crate::error::ConfigError;
use crate::merge::merge_all;
use crate::options::ConfigOptions;
use crate::resolve::DirectiveResolver;
use crate::secret::{NoSecretStore, SecretResolver};
use crate::source::{DocumentSource, YamlFileSource};
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Immutable handle to a validated configuration snapshot.
///
/// A handle only exists after a load has fully succeeded, so consumers can
/// never observe partial or unvalidated configuration. Cloning is cheap and
/// all clones share the same snapshot.
#[derive(Debug)]
pub struct Snapshot<T>(Arc<T>);

impl<T> Snapshot<T> {
    /// Access the validated configuration.
    pub fn get(&self) -> &T {
        &self.0
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Snapshot(Arc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// Orchestrates the load pipeline against pluggable collaborators.
///
/// By default layers come from YAML files on disk, environment variables
/// from the process environment, and secret directives fail loudly until a
/// store is wired in with [`ConfigLoader::with_secrets`].
pub struct ConfigLoader {
    options: ConfigOptions,
    source: Box<dyn DocumentSource>,
    env: Box<dyn EnvResolver>,
    secrets: Box<dyn SecretResolver>,
}

impl ConfigLoader {
    /// Loader over YAML files and the process environment.
    pub fn new(options: ConfigOptions) -> Self {
        Self {
            options,
            source: Box::new(YamlFileSource),
            env: Box::new(ProcessEnv),
            secrets: Box::new(NoSecretStore),
        }
    }

    /// Replace the document source (tests, alternate formats).
    pub fn with_source(mut self, source: impl DocumentSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Replace the environment resolver.
    pub fn with_env(mut self, env: impl EnvResolver + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Wire in a secret store for `$from.secret` directives.
    pub fn with_secrets(mut self, secrets: impl SecretResolver + 'static) -> Self {
        self.secrets = Box::new(secrets);
        self
    }

    /// Run the whole pipeline once and publish a validated snapshot.
    ///
    /// `T` is the schema: the merged tree must deserialize into it. Mark the
    /// type (and its nested types) `#[serde(deny_unknown_fields)]` to reject
    /// keys the schema does not declare.
    ///
    /// Calling this again re-runs everything and yields a fresh snapshot;
    /// previously published snapshots are unaffected.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Snapshot<T>, ConfigError> {
        let merged = self.load_merged().await?;
        let config = serde_json::from_value(merged)
            .map_err(|e| ConfigError::validation("$", format!("schema validation error: {e}")))?;
        info!(env = %self.options.env, "configuration loaded");
        Ok(Snapshot(Arc::new(config)))
    }

    /// Load, resolve, and merge the layer stack without typed validation.
    ///
    /// Exposed for callers that need the raw merged tree; [`Self::load`] is
    /// the validated path.
    pub async fn load_merged(&self) -> Result<Value, ConfigError> {
        let [base_path, env_path] = self.options.layer_paths();
        debug!(
            base = %base_path.display(),
            env = %env_path.display(),
            "loading config layers"
        );

        let (base, overlay) = tokio::try_join!(
            self.source.read(&base_path),
            self.source.read(&env_path)
        )?;

        // An empty document contributes nothing; it is not an error.
        let layers: Vec<Value> = [base, overlay]
            .into_iter()
            .filter(|layer| !layer.is_null())
            .collect();

        let resolver = DirectiveResolver::new(self.env.as_ref(), self.secrets.as_ref());
        let resolved = try_join_all(
            layers
                .into_iter()
                .map(|layer| resolver.resolve_layer(layer)),
        )
        .await?;

        Ok(merge_all(resolved))
    }
}
