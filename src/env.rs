//! Environment variable lookup for `$from.env` directives.

/// Looks up environment variables by name.
///
/// Lookup is synchronous and infallible: an unset variable is `None`, and
/// whether that is acceptable is decided later by schema validation.
pub trait EnvResolver: Send + Sync {
    /// Value of `name`, or `None` when unset.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Resolves against the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvResolver for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}
