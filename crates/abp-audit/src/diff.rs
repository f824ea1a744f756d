//! Field-level diff computation.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// Compute the `{attr: [old, new]}` diff between two serialized records.
///
/// Only top-level attributes are compared; nested structures diff as a
/// whole. Attributes on the ignore list never appear in the result, and
/// `old == Value::Null` (the create case) diffs every present attribute
/// against `null`.
#[must_use]
pub fn diff_objects(old: &Value, new: &Value, ignored: &BTreeSet<String>) -> Map<String, Value> {
    let empty = Map::new();
    let old_map = old.as_object().unwrap_or(&empty);
    let new_map = new.as_object().unwrap_or(&empty);

    let mut keys: BTreeSet<&String> = old_map.keys().collect();
    keys.extend(new_map.keys());

    let mut changes = Map::new();
    for key in keys {
        if ignored.contains(key.as_str()) {
            continue;
        }
        let old_value = old_map.get(key).cloned().unwrap_or(Value::Null);
        let new_value = new_map.get(key).cloned().unwrap_or(Value::Null);
        if old_value != new_value {
            changes.insert(key.clone(), Value::Array(vec![old_value, new_value]));
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unchanged_attributes_are_absent() {
        let old = json!({"title": "A", "state": "prospect"});
        let new = json!({"title": "B", "state": "prospect"});
        let changes = diff_objects(&old, &new, &BTreeSet::new());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["title"], json!(["A", "B"]));
    }

    #[test]
    fn removed_attributes_diff_to_null() {
        let old = json!({"comment": "call back"});
        let new = json!({});
        let changes = diff_objects(&old, &new, &BTreeSet::new());
        assert_eq!(changes["comment"], json!(["call back", null]));
    }

    #[test]
    fn ignored_attributes_are_skipped() {
        let ignored = BTreeSet::from(["updated_at".to_string()]);
        let old = json!({"updated_at": "2024-01-01T00:00:00Z", "title": "A"});
        let new = json!({"updated_at": "2024-06-01T00:00:00Z", "title": "A"});
        assert!(diff_objects(&old, &new, &ignored).is_empty());
    }

    #[test]
    fn create_diff_compares_against_null() {
        let new = json!({"title": "A"});
        let changes = diff_objects(&Value::Null, &new, &BTreeSet::new());
        assert_eq!(changes["title"], json!([null, "A"]));
    }
}
