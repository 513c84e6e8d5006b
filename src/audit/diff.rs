//! Diff generation for audit log entries
//!
//! Compares two serialized snapshots field by field and renders the changes
//! for display next to an UPDATE entry.

use serde_json::Value;

/// One top-level field whose value differs between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: String,
    /// `None` when the field was absent before
    pub before: Option<String>,
    /// `None` when the field is absent after
    pub after: Option<String>,
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.field,
            self.before.as_deref().unwrap_or("(added)"),
            self.after.as_deref().unwrap_or("(removed)")
        )
    }
}

/// List the top-level fields that differ between two JSON objects
///
/// Non-object values are compared as a whole and reported under the field
/// name `value`.
pub fn field_changes(before: &Value, after: &Value) -> Vec<FieldChange> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        if before == after {
            return Vec::new();
        }
        return vec![FieldChange {
            field: "value".to_string(),
            before: Some(format_value(before)),
            after: Some(format_value(after)),
        }];
    };

    let mut changes: Vec<FieldChange> = before_obj
        .iter()
        .filter(|(key, value)| after_obj.get(*key) != Some(*value))
        .map(|(key, value)| FieldChange {
            field: key.clone(),
            before: Some(format_value(value)),
            after: after_obj.get(key).map(format_value),
        })
        .collect();

    changes.extend(
        after_obj
            .iter()
            .filter(|(key, _)| !before_obj.contains_key(*key))
            .map(|(key, value)| FieldChange {
                field: key.clone(),
                before: None,
                after: Some(format_value(value)),
            }),
    );

    changes
}

/// Generate a one-line, comma-separated summary of the changes
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = field_changes(before, after);
    if changes.is_empty() {
        return None;
    }

    Some(
        changes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_field_change() {
        let before = json!({"forename": "create", "surname": "test"});
        let after = json!({"forename": "I'm updated!", "surname": "test"});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "forename: \"create\" -> \"I'm updated!\"");
    }

    #[test]
    fn test_no_changes() {
        let before = json!({"forename": "Peter", "is_active": true});
        assert!(generate_diff(&before, &before.clone()).is_none());
        assert!(field_changes(&before, &before).is_empty());
    }

    #[test]
    fn test_multiple_changes() {
        let before = json!({"email": "a@example.com", "forename": "A", "is_active": false});
        let after = json!({"email": "b@example.com", "forename": "A", "is_active": true});

        let changes = field_changes(&before, &after);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().any(|c| c.field == "email"));
        assert!(changes
            .iter()
            .any(|c| c.to_string() == "is_active: false -> true"));
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"forename": "Test", "legacy": "value"});
        let after = json!({"forename": "Test", "email": "t@example.com"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("legacy: \"value\" -> (removed)"));
        assert!(diff.contains("email: (added) -> \"t@example.com\""));
    }

    #[test]
    fn test_scalar_values() {
        let changes = field_changes(&json!(1), &json!(2));
        assert_eq!(changes[0].to_string(), "value: 1 -> 2");
        assert!(field_changes(&json!(null), &json!(null)).is_empty());
    }

    #[test]
    fn test_long_string_truncation() {
        let before = json!({"email": "a".repeat(100)});
        let after = json!({"email": "short@example.com"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!("test")), "\"test\"");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
    }
}
