//! Deterministic deep merge of resolved layers.
//!
//! Objects merge key-by-key, recursively. Every other value, arrays
//! included, is opaque to the merger: the later layer replaces it outright.

use serde_json::Value;

/// Deep-merge `overlay` onto `base`, with `overlay` winning on conflicts.
///
/// - When both sides hold plain objects, their keys merge recursively.
/// - Otherwise the overlay value wins outright, including null and arrays;
///   arrays are never concatenated or merged by index.
/// - Keys present on only one side are preserved.
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Fold an ordered layer list, later layers overriding earlier ones.
///
/// Merge order is the iteration order, never resolution timing; an empty
/// list yields an empty object.
pub fn merge_all(layers: impl IntoIterator<Item = Value>) -> Value {
    layers
        .into_iter()
        .fold(Value::Object(serde_json::Map::new()), merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn later_scalar_wins() {
        let merged = merge(json!({"foo": 1}), json!({"foo": 5}));
        assert_eq!(merged, json!({"foo": 5}));
    }

    #[test]
    fn single_side_keys_are_preserved() {
        let merged = merge(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn nested_objects_merge_recursively() {
        let base = json!({"foo": 1, "obj": {"key1": "foo"}});
        let overlay = json!({"foo": 5, "obj": {"key2": "bar"}});
        assert_eq!(
            merge(base, overlay),
            json!({"foo": 5, "obj": {"key1": "foo", "key2": "bar"}})
        );
    }

    #[test]
    fn arrays_are_replaced_not_merged() {
        let merged = merge(json!({"items": [1, 2, 3]}), json!({"items": [4]}));
        assert_eq!(merged, json!({"items": [4]}));
    }

    #[test]
    fn later_empty_array_replaces_earlier_array() {
        let merged = merge(json!({"items": [1, 2, 3]}), json!({"items": []}));
        assert_eq!(merged, json!({"items": []}));
    }

    #[test]
    fn later_null_wins() {
        let merged = merge(json!({"a": 1}), json!({"a": null}));
        assert_eq!(merged, json!({"a": null}));
    }

    #[test]
    fn object_replaces_scalar_and_vice_versa() {
        assert_eq!(
            merge(json!({"v": 42}), json!({"v": {"nested": true}})),
            json!({"v": {"nested": true}})
        );
        assert_eq!(
            merge(json!({"v": {"nested": true}}), json!({"v": 42})),
            json!({"v": 42})
        );
    }

    #[test]
    fn merge_all_folds_in_order() {
        let layers = vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3, "c": 4})];
        assert_eq!(merge_all(layers), json!({"a": 3, "b": 2, "c": 4}));
    }

    #[test]
    fn merge_all_of_nothing_is_empty_object() {
        assert_eq!(merge_all(Vec::<Value>::new()), json!({}));
    }

    #[test]
    fn deeply_nested_disjoint_keys_union() {
        let base = json!({"l1": {"l2": {"a": 1}}});
        let overlay = json!({"l1": {"l2": {"b": 2}}});
        assert_eq!(merge(base, overlay), json!({"l1": {"l2": {"a": 1, "b": 2}}}));
    }
}
