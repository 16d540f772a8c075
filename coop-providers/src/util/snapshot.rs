use serde_json::Value;

/// `(key, child)` pairs of a collection node, `None` for a leaf.
///
/// The realtime database returns a collection whose keys are all small
/// integers as a JSON array, with `null` at the missing indexes. Such arrays
/// list their children under the index as key.
pub(crate) fn children(value: Value) -> Option<Vec<(String, Value)>> {
    match value {
        Value::Object(children) => Some(children.into_iter().collect()),
        Value::Array(items) => Some(
            items
                .into_iter()
                .enumerate()
                .filter(|(_, child)| !child.is_null())
                .map(|(index, child)| (index.to_string(), child))
                .collect(),
        ),
        _ => None,
    }
}
