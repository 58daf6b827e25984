//! Node classification for the directive resolver.
//!
//! Every JSON-like node is classified once, before recursion, into a tagged
//! variant. Directive shape violations are caught here so the resolver only
//! ever sees well-formed directives.

use crate::error::ConfigError;
use regex_lite::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Key marking an object as an indirection directive.
pub(crate) const DIRECTIVE_KEY: &str = "$from";

/// Secret references must name a versioned secret resource.
fn secret_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"projects/.*/secrets/.*/versions/.*").expect("secret pattern is valid")
    })
}

/// Wire shape of the `$from` payload. Optionality of both fields lets the
/// XOR check produce a better diagnostic than a serde error would.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectiveSpec {
    #[serde(default)]
    secret: Option<String>,
    #[serde(default)]
    env: Option<String>,
}

/// A validated directive: exactly one source of indirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Indirection {
    /// Load from the secret store by resource name.
    Secret(String),
    /// Look up an environment variable.
    Env(String),
}

/// One parsed node, classified for recursion.
#[derive(Debug)]
pub(crate) enum Node {
    /// Strings, numbers, booleans, null: returned unchanged.
    Scalar(Value),
    /// Arrays: elements resolve recursively, order preserved.
    Sequence(Vec<Value>),
    /// Plain objects: values resolve recursively under their keys.
    Mapping(Map<String, Value>),
    /// A `$from` directive, already shape-checked.
    Directive(Indirection),
}

/// Classify `value`, validating directive shape when `$from` is present.
pub(crate) fn classify(value: Value, path: &str) -> Result<Node, ConfigError> {
    match value {
        Value::Array(items) => Ok(Node::Sequence(items)),
        Value::Object(map) if map.contains_key(DIRECTIVE_KEY) => {
            Ok(Node::Directive(parse_directive(map, path)?))
        }
        Value::Object(map) => Ok(Node::Mapping(map)),
        scalar => Ok(Node::Scalar(scalar)),
    }
}

fn parse_directive(mut map: Map<String, Value>, path: &str) -> Result<Indirection, ConfigError> {
    let payload = map
        .remove(DIRECTIVE_KEY)
        .unwrap_or(Value::Null); // guarded by contains_key in classify()

    if !map.is_empty() {
        let siblings: Vec<&str> = map.keys().map(String::as_str).collect();
        return Err(ConfigError::validation(
            path,
            format!(
                "`{DIRECTIVE_KEY}` must be the only key on its object, found siblings: {}",
                siblings.join(", ")
            ),
        ));
    }

    let spec: DirectiveSpec = serde_json::from_value(payload).map_err(|e| {
        ConfigError::validation(path, format!("malformed `{DIRECTIVE_KEY}` directive: {e}"))
    })?;

    match (spec.secret, spec.env) {
        (Some(_), Some(_)) => Err(ConfigError::validation(
            path,
            "`secret` or `env` needs to be specified, but not both",
        )),
        (None, None) => Err(ConfigError::validation(
            path,
            "`secret` or `env` needs to be specified, but not both",
        )),
        (Some(reference), None) => {
            if !secret_pattern().is_match(&reference) {
                return Err(ConfigError::validation(
                    path,
                    format!(
                        "secret reference '{reference}' does not match \
                         projects/<p>/secrets/<s>/versions/<v>"
                    ),
                ));
            }
            Ok(Indirection::Secret(reference))
        }
        (None, Some(name)) => Ok(Indirection::Env(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_ok(value: Value) -> Node {
        classify(value, "$.node").expect("classification should succeed")
    }

    fn classify_err(value: Value) -> ConfigError {
        classify(value, "$.node").expect_err("classification should fail")
    }

    #[test]
    fn scalars_classify_as_scalar() {
        for value in [json!("text"), json!(42), json!(true), json!(null)] {
            assert!(matches!(classify_ok(value), Node::Scalar(_)));
        }
    }

    #[test]
    fn arrays_and_objects_classify_structurally() {
        assert!(matches!(classify_ok(json!([1, 2])), Node::Sequence(_)));
        assert!(matches!(classify_ok(json!({"a": 1})), Node::Mapping(_)));
    }

    #[test]
    fn env_directive_classifies() {
        let node = classify_ok(json!({"$from": {"env": "DATABASE_URL"}}));
        match node {
            Node::Directive(Indirection::Env(name)) => assert_eq!(name, "DATABASE_URL"),
            other => panic!("expected env directive, got {other:?}"),
        }
    }

    #[test]
    fn secret_directive_classifies() {
        let node = classify_ok(json!({
            "$from": {"secret": "projects/p/secrets/s/versions/latest"}
        }));
        match node {
            Node::Directive(Indirection::Secret(reference)) => {
                assert_eq!(reference, "projects/p/secrets/s/versions/latest");
            }
            other => panic!("expected secret directive, got {other:?}"),
        }
    }

    #[test]
    fn both_secret_and_env_is_rejected() {
        let err = classify_err(json!({
            "$from": {
                "env": "FAKE_ENV",
                "secret": "projects/p/secrets/s/versions/latest"
            }
        }));
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn neither_secret_nor_env_is_rejected() {
        let err = classify_err(json!({"$from": {}}));
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn sibling_keys_are_rejected() {
        let err = classify_err(json!({
            "$from": {"env": "FAKE_ENV"},
            "other": "value"
        }));
        let text = err.to_string();
        assert!(text.contains("other"), "diagnostic should name the sibling: {text}");
    }

    #[test]
    fn unknown_directive_fields_are_rejected() {
        let err = classify_err(json!({"$from": {"vault": "kv/path"}}));
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = classify_err(json!({"$from": "DATABASE_URL"}));
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn bad_secret_format_is_rejected() {
        let err = classify_err(json!({"$from": {"secret": "bad-format"}}));
        let text = err.to_string();
        assert!(text.contains("bad-format"));
    }

    #[test]
    fn directive_errors_carry_the_path() {
        let err = classify(json!({"$from": {}}), "$.db.password").unwrap_err();
        match err {
            ConfigError::Validation { path, .. } => assert_eq!(path, "$.db.password"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
