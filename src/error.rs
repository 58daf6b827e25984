//! Typed errors for layer loading, directive resolution, and validation.

use std::path::Path;
use thiserror::Error;

/// Errors surfaced while loading layered configuration.
///
/// Every variant is fatal to the load that produced it; nothing is retried
/// and no partial configuration is ever published.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer file could not be read or parsed.
    #[error("could not read config at {path}: {message}")]
    Read {
        /// Path of the layer file that failed.
        path: String,
        /// Underlying I/O or parse diagnostic.
        message: String,
    },

    /// A `$from` directive violated its shape, or the merged tree failed
    /// schema validation.
    #[error("validation error at `{path}`: {message}")]
    Validation {
        /// Structural path of the offending node (`$` for the whole tree).
        path: String,
        /// Diagnostic describing the violation.
        message: String,
    },

    /// The secret backing store failed to resolve a reference.
    #[error("secret '{reference}' at `{path}` could not be loaded: {message}")]
    SecretLoad {
        /// The secret resource name that was requested.
        reference: String,
        /// Structural path of the directive requesting the secret.
        path: String,
        /// Diagnostic from the backing store.
        message: String,
    },
}

impl ConfigError {
    /// A read failure for the layer file at `path`.
    pub fn read(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        ConfigError::Read {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    /// A validation failure at a structural path.
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// A secret load failure for `reference` requested at `path`.
    pub fn secret_load(
        reference: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::SecretLoad {
            reference: reference.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path_and_cause() {
        let err = ConfigError::read("config/index.yaml", "no such file");
        assert_eq!(
            err.to_string(),
            "could not read config at config/index.yaml: no such file"
        );

        let err = ConfigError::validation("$.from", "exactly one of `secret` or `env` must be set");
        assert!(err.to_string().contains("$.from"));

        let err = ConfigError::secret_load(
            "projects/p/secrets/s/versions/1",
            "$.db.password",
            "permission denied",
        );
        let text = err.to_string();
        assert!(text.contains("projects/p/secrets/s/versions/1"));
        assert!(text.contains("$.db.password"));
        assert!(text.contains("permission denied"));
    }
}
