//! Startup options and layer path computation.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the base layer, always loaded first.
const BASE_LAYER_FILE: &str = "index.yaml";

/// Default directory searched for layer files.
const DEFAULT_CONFIG_DIR: &str = "./config";

/// Deployment environment selecting the environment-specific layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production deployments (`env.production.yaml`).
    Production,
    /// Staging deployments (`env.staging.yaml`).
    Staging,
    /// Local development (`env.development.yaml`).
    Development,
}

impl Environment {
    /// File name of the environment-specific layer.
    pub fn layer_file(&self) -> &'static str {
        match self {
            Environment::Production => "env.production.yaml",
            Environment::Staging => "env.staging.yaml",
            Environment::Development => "env.development.yaml",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Staging => write!(f, "staging"),
            Environment::Development => write!(f, "development"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            other => Err(ConfigError::validation(
                "$",
                format!("unrecognized environment '{other}'"),
            )),
        }
    }
}

/// Immutable inputs for one configuration load.
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    /// Directory containing the layer files.
    pub config_dir: PathBuf,
    /// Environment whose overlay layer is loaded on top of the base.
    pub env: Environment,
}

impl ConfigOptions {
    /// Options for `env`, reading layers from `./config`.
    pub fn new(env: Environment) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            env,
        }
    }

    /// Read layers from `dir` instead of the default directory.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Layer files in merge order: base first, then the environment overlay.
    pub fn layer_paths(&self) -> [PathBuf; 2] {
        [
            self.config_dir.join(BASE_LAYER_FILE),
            self.config_dir.join(self.env.layer_file()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_paths_are_base_then_environment() {
        let options =
            ConfigOptions::new(Environment::Staging).with_config_dir("/etc/myapp/config");
        let [base, env] = options.layer_paths();
        assert_eq!(base, PathBuf::from("/etc/myapp/config/index.yaml"));
        assert_eq!(env, PathBuf::from("/etc/myapp/config/env.staging.yaml"));
    }

    #[test]
    fn default_config_dir() {
        let options = ConfigOptions::new(Environment::Production);
        let [base, _] = options.layer_paths();
        assert_eq!(base, PathBuf::from("./config/index.yaml"));
    }

    #[test]
    fn environment_round_trips_through_str() {
        for env in [
            Environment::Production,
            Environment::Staging,
            Environment::Development,
        ] {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
        assert!("qa".parse::<Environment>().is_err());
    }
}
