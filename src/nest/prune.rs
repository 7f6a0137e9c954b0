//! Removal of empty values from an assembled document

use serde_json::{Map, Value};

/// Prune a value, returning `None` when nothing meaningful is left.
///
/// `null` and `""` are dropped. Objects and arrays are pruned bottom-up and
/// dropped once empty; array elements that prune away are removed from the
/// array. Other scalars are kept as they are.
pub fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Object(obj) => {
            let obj = prune_document(obj);
            if obj.is_empty() {
                None
            } else {
                Some(Value::Object(obj))
            }
        }
        Value::Array(arr) => {
            let arr: Vec<Value> = arr.into_iter().filter_map(prune).collect();
            if arr.is_empty() {
                None
            } else {
                Some(Value::Array(arr))
            }
        }
        other => Some(other),
    }
}

/// Prune every entry of an object. The object itself is kept even when it
/// ends up empty.
pub fn prune_document(obj: Map<String, Value>) -> Map<String, Value> {
    obj.into_iter()
        .filter_map(|(key, value)| prune(value).map(|value| (key, value)))
        .collect()
}
