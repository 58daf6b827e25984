//! Layered configuration loading with secret and environment indirection.
//!
//! Configuration is read from an ordered pair of YAML layers (`index.yaml`
//! plus an `env.<environment>.yaml` overlay), `$from` directives are replaced
//! with live values from a secret store or the process environment, the
//! layers are deep-merged (objects key-by-key, arrays replaced wholesale),
//! and the result is validated into a caller-supplied type. Loading happens
//! once, atomically; the published snapshot never changes.
//!
//! ```no_run
//! use serde::Deserialize;
//! use stratum_config::{ConfigLoader, ConfigOptions, Environment};
//!
//! #[derive(Deserialize)]
//! #[serde(deny_unknown_fields)]
//! struct AppConfig {
//!     database_url: String,
//!     port: u16,
//! }
//!
//! # async fn run() -> Result<(), stratum_config::ConfigError> {
//! let options = ConfigOptions::new(Environment::Development);
//! let config = ConfigLoader::new(options).load::<AppConfig>().await?;
//! println!("listening on {}", config.port);
//! # Ok(())
//! # }
//! ```
//!
//! Indirection directives embed anywhere in a layer:
//!
//! ```yaml
//! database_url:
//!   $from:
//!     secret: projects/my-project/secrets/db-url/versions/latest
//! port:
//!   $from:
//!     env: APP_PORT
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod merge;
mod node;
pub mod options;
pub mod resolve;
pub mod secret;
pub mod source;

pub use env::{EnvResolver, ProcessEnv};
pub use error::ConfigError;
pub use loader::{ConfigLoader, Snapshot};
pub use merge::{merge, merge_all};
pub use options::{ConfigOptions, Environment};
pub use resolve::DirectiveResolver;
pub use secret::{CachedSecrets, NoSecretStore, SecretResolver};
pub use source::{DocumentSource, YamlFileSource};
