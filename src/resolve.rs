//! Directive resolution: transforms one parsed layer into a resolved tree.
//!
//! Children of a node resolve concurrently, but reassembly always follows
//! the original key and index order, so completion order never shows in the
//! output. The first failure anywhere in the tree fails the whole layer.

use crate::env::EnvResolver;
use crate::error::ConfigError;
use crate::node::{Indirection, Node, classify};
use crate::secret::SecretResolver;
use futures::future::{BoxFuture, try_join_all};
use serde_json::Value;
use tracing::debug;

/// Resolves `$from` directives within a single layer document.
pub struct DirectiveResolver<'a> {
    env: &'a dyn EnvResolver,
    secrets: &'a dyn SecretResolver,
}

impl<'a> DirectiveResolver<'a> {
    /// Resolver backed by the given collaborators.
    pub fn new(env: &'a dyn EnvResolver, secrets: &'a dyn SecretResolver) -> Self {
        Self { env, secrets }
    }

    /// Replace every directive in `document`, leaving structure untouched.
    pub async fn resolve_layer(&self, document: Value) -> Result<Value, ConfigError> {
        self.resolve_value(document, String::from("$")).await
    }

    fn resolve_value(
        &self,
        value: Value,
        path: String,
    ) -> BoxFuture<'_, Result<Value, ConfigError>> {
        Box::pin(async move {
            match classify(value, &path)? {
                Node::Scalar(scalar) => Ok(scalar),
                Node::Sequence(items) => {
                    let children = items
                        .into_iter()
                        .enumerate()
                        .map(|(index, item)| self.resolve_value(item, format!("{path}[{index}]")));
                    Ok(Value::Array(try_join_all(children).await?))
                }
                Node::Mapping(map) => {
                    let (keys, values): (Vec<String>, Vec<Value>) = map.into_iter().unzip();
                    let children = keys
                        .iter()
                        .zip(values)
                        .map(|(key, child)| self.resolve_value(child, format!("{path}.{key}")));
                    let resolved = try_join_all(children).await?;
                    Ok(Value::Object(keys.into_iter().zip(resolved).collect()))
                }
                Node::Directive(directive) => self.resolve_directive(directive, &path).await,
            }
        })
    }

    async fn resolve_directive(
        &self,
        directive: Indirection,
        path: &str,
    ) -> Result<Value, ConfigError> {
        match directive {
            Indirection::Secret(reference) => {
                debug!(path = %path, reference = %reference, "resolving secret directive");
                let value = self.secrets.load(&reference, path).await?;
                Ok(Value::String(value))
            }
            Indirection::Env(name) => {
                debug!(path = %path, variable = %name, "resolving env directive");
                // Absence is the schema's concern, not a resolution error.
                Ok(match self.env.lookup(&name) {
                    Some(value) => Value::String(value),
                    None => Value::Null,
                })
            }
        }
    }
}
